use thiserror::Error;

use crate::constants::{LITERAL_FLAG, MAX_RUN};
use crate::image::frame::Frame;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RleDecompressionError {
    #[error("run at payload offset {offset} is missing {missing} byte(s)")]
    TruncatedRun { offset: usize, missing: usize },
    #[error("run at payload offset {offset} writes past the last pixel")]
    PixelOverflow { offset: usize },
}

/// Position of an encode or decode pass over one frame.
///
/// Walks x fastest, then y, both ascending. Traversal row `y` maps to grid row
/// `height - 1 - y` because the grid is stored bottom-up.
pub(crate) struct FrameCursor {
    width: usize,
    height: usize,
    x: usize,
    y: usize,
}

impl FrameCursor {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as usize,
            height: height as usize,
            x: 0,
            y: 0,
        }
    }

    /// Steps to the next pixel. Returns false once traversal runs off the end.
    pub(crate) fn advance(&mut self) -> bool {
        self.x += 1;
        if self.x >= self.width {
            self.x = 0;
            self.y += 1;
        }
        self.y < self.height
    }

    /// Steps back one pixel. Never called at the origin.
    pub(crate) fn retreat(&mut self) {
        if self.x == 0 {
            self.x = self.width - 1;
            self.y -= 1;
        } else {
            self.x -= 1;
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.y >= self.height
    }

    pub(crate) fn read(&self, pixels: &[u8]) -> u8 {
        pixels[self.grid_index()]
    }

    pub(crate) fn write(&self, pixels: &mut [u8], value: u8) {
        pixels[self.grid_index()] = value;
    }

    fn grid_index(&self) -> usize {
        (self.height - 1 - self.y) * self.width + self.x
    }
}

/// Run-length encodes a frame into control-byte runs.
///
/// A control byte below `0x80` is a clone run: the next byte repeated that many
/// times. With the high bit set, the low 7 bits count the literal bytes that
/// follow. The result may be longer than the raw image; see
/// [`super::compress`] for the fallback.
pub fn rle_compression(frame: &Frame) -> Vec<u8> {
    let pixels = frame.pixels();
    let mut out = Vec::new();
    if pixels.is_empty() {
        return out;
    }

    let mut cursor = FrameCursor::new(frame.width(), frame.height());
    loop {
        let value = cursor.read(pixels);

        if !cursor.advance() {
            // Lone last pixel.
            out.push(LITERAL_FLAG | 1);
            out.push(value);
        } else if cursor.read(pixels) == value {
            let mut run = 2u8;
            while cursor.advance() && cursor.read(pixels) == value && run < MAX_RUN {
                run += 1;
            }
            out.push(run);
            out.push(value);
        } else {
            let control = out.len();
            out.push(0);
            out.push(value);
            out.push(cursor.read(pixels));

            let mut run = 2u8;
            while cursor.advance() && cursor.read(pixels) != out[out.len() - 1] && run < MAX_RUN {
                out.push(cursor.read(pixels));
                run += 1;
            }

            // A repeat belongs to the clone run that follows.
            if !cursor.is_exhausted() && cursor.read(pixels) == out[out.len() - 1] {
                run -= 1;
                out.pop();
                cursor.retreat();
            }

            out[control] = LITERAL_FLAG | run;
        }

        if cursor.is_exhausted() {
            break;
        }
    }

    out
}

/// The frame's pixels in traversal order with no control bytes.
pub fn raw_stream(frame: &Frame) -> Vec<u8> {
    let pixels = frame.pixels();
    let mut out = Vec::with_capacity(pixels.len());
    if pixels.is_empty() {
        return out;
    }

    let mut cursor = FrameCursor::new(frame.width(), frame.height());
    loop {
        out.push(cursor.read(pixels));
        if !cursor.advance() {
            break;
        }
    }
    out
}

/// Expands control-byte runs into `frame`'s grid.
///
/// Returns the number of pixels written, which can be less than the grid
/// when the payload ends early.
pub fn rle_decompression(data: &[u8], frame: &mut Frame) -> Result<usize, RleDecompressionError> {
    let mut cursor = FrameCursor::new(frame.width(), frame.height());
    let pixels = frame.pixels_mut();
    let total = pixels.len();

    let mut written = 0usize;
    let mut pos = 0usize;

    while pos < data.len() {
        let offset = pos;
        let control = data[pos];
        pos += 1;

        let run = (control & MAX_RUN) as usize;
        if written + run > total {
            return Err(RleDecompressionError::PixelOverflow { offset });
        }

        if control & LITERAL_FLAG != 0 {
            let literals = data
                .get(pos..pos + run)
                .ok_or_else(|| RleDecompressionError::TruncatedRun {
                    offset,
                    missing: pos + run - data.len(),
                })?;
            for &value in literals {
                cursor.write(pixels, value);
                cursor.advance();
            }
            pos += run;
        } else {
            let value = *data
                .get(pos)
                .ok_or(RleDecompressionError::TruncatedRun { offset, missing: 1 })?;
            pos += 1;
            for _ in 0..run {
                cursor.write(pixels, value);
                cursor.advance();
            }
        }

        written += run;
    }

    Ok(written)
}

/// Copies an uncompressed payload into `frame`'s grid in traversal order.
///
/// Returns the number of pixels written; bytes beyond the grid are ignored.
pub fn raw_decompression(data: &[u8], frame: &mut Frame) -> usize {
    let mut cursor = FrameCursor::new(frame.width(), frame.height());
    let pixels = frame.pixels_mut();
    let count = data.len().min(pixels.len());

    for &value in &data[..count] {
        cursor.write(pixels, value);
        cursor.advance();
    }
    count
}
