use serde::{Deserialize, Serialize};

use super::color::PaletteTable;
use crate::constants::PLACEHOLDER_SIZE;

/// Per-frame record, 28 bytes on disk.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameHeader {
    pub width: u32,
    pub height: u32,
    /// Byte length of the payload that follows all frame headers.
    pub size: u32,
    pub center_x: i32,
    pub center_y: i32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl FrameHeader {
    /// Pixel count, or `None` if it does not fit in `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

/// One sprite frame: its header and an 8-bit indexed pixel grid.
///
/// The grid is stored bottom-up: row 0 is the bottom scanline, the same order
/// a BMP stores its rows in. The codec walks the image top-down, so traversal
/// row `y` lives in grid row `height - 1 - y`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    header: FrameHeader,
    pixels: Vec<u8>,
}

impl Frame {
    /// An all-zero frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let mut frame = Self::default();
        frame.set_size(width, height);
        frame
    }

    /// Frame with a header read from a stream and an empty grid of matching size.
    pub fn from_header(header: FrameHeader) -> Self {
        let len = header.width as usize * header.height as usize;
        Self {
            header,
            pixels: vec![0; len],
        }
    }

    /// Stand-in for a frame whose bitmap is missing from an interchange set.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE)
    }

    /// Resizes the grid and clears it. Anchor and offset are kept.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.header.width = width;
        self.header.height = height;
        self.pixels = vec![0; width as usize * height as usize];
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn center(&self) -> (i32, i32) {
        (self.header.center_x, self.header.center_y)
    }

    pub fn set_center(&mut self, x: i32, y: i32) {
        self.header.center_x = x;
        self.header.center_y = y;
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.header.offset_x, self.header.offset_y)
    }

    pub fn set_offset(&mut self, x: i32, y: i32) {
        self.header.offset_x = x;
        self.header.offset_y = y;
    }

    /// The whole grid, bottom row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Value at column `x` of grid row `row` (row 0 is the bottom).
    ///
    /// # Panics
    ///
    /// Panics if `x` or `row` is outside the grid.
    pub fn pixel(&self, x: u32, row: u32) -> u8 {
        self.pixels[self.index(x, row)]
    }

    /// # Panics
    ///
    /// Panics if `x` or `row` is outside the grid.
    pub fn set_pixel(&mut self, x: u32, row: u32, value: u8) {
        let idx = self.index(x, row);
        self.pixels[idx] = value;
    }

    /// Grid row `row` (row 0 is the bottom). Panics if `row` is outside the grid.
    pub fn row(&self, row: u32) -> &[u8] {
        let range = self.row_range(row);
        &self.pixels[range]
    }

    pub fn row_mut(&mut self, row: u32) -> &mut [u8] {
        let range = self.row_range(row);
        &mut self.pixels[range]
    }

    /// Rows as displayed, top scanline first.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let width = self.header.width as usize;
        // chunks() rejects 0; a zero-width grid is empty anyway.
        self.pixels.chunks(width.max(1)).rev()
    }

    /// Expands the frame through `palette` into top-down RGBA bytes.
    pub fn to_rgba(&self, palette: &PaletteTable) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for row in self.rows_top_down() {
            for &index in row {
                out.extend_from_slice(&palette.get(index).to_rgba());
            }
        }
        out
    }

    fn index(&self, x: u32, row: u32) -> usize {
        assert!(
            x < self.header.width && row < self.header.height,
            "pixel ({}, {}) outside {}x{} grid",
            x,
            row,
            self.header.width,
            self.header.height
        );
        row as usize * self.header.width as usize + x as usize
    }

    fn row_range(&self, row: u32) -> std::ops::Range<usize> {
        assert!(
            row < self.header.height,
            "row {} outside {}x{} grid",
            row,
            self.header.width,
            self.header.height
        );
        let width = self.header.width as usize;
        let start = row as usize * width;
        start..start + width
    }
}
