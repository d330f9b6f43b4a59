use serde::{Deserialize, Serialize};

use crate::constants::{COLOR_SIZE, PALETTE_ENTRIES, PALETTE_TABLE_SIZE};

/// Four raw bytes as stored on disk: blue, green, red, then an unused byte.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(b: u8, g: u8, r: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    pub fn from_bytes(bytes: [u8; COLOR_SIZE]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    pub fn to_bytes(self) -> [u8; COLOR_SIZE] {
        [self.b, self.g, self.r, self.a]
    }

    /// A header summary color marks a palette slot as used when any channel is set.
    pub fn marks_palette(self) -> bool {
        (self.a | self.b | self.g | self.r) != 0
    }

    /// Display color for a renderer. The stored fourth byte is not alpha in
    /// practice, so the result is always opaque.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xFF]
    }
}

/// 256 colors indexed by pixel value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteTable {
    colors: Box<[Color; PALETTE_ENTRIES]>,
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self {
            colors: Box::new([Color::default(); PALETTE_ENTRIES]),
        }
    }
}

impl PaletteTable {
    pub fn new(colors: [Color; PALETTE_ENTRIES]) -> Self {
        Self {
            colors: Box::new(colors),
        }
    }

    /// Gray ramp used when a bitmap has to be written for a container without palettes.
    pub fn grayscale() -> Self {
        let mut table = Self::default();
        for (i, color) in table.colors.iter_mut().enumerate() {
            let v = i as u8;
            *color = Color::new(v, v, v, 0);
        }
        table
    }

    /// Builds a table from exactly [`PALETTE_TABLE_SIZE`] bytes; `None` on any other length.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != PALETTE_TABLE_SIZE {
            return None;
        }
        let mut table = Self::default();
        for (color, chunk) in table.colors.iter_mut().zip(bytes.chunks_exact(COLOR_SIZE)) {
            *color = Color::new(chunk[0], chunk[1], chunk[2], chunk[3]);
        }
        Some(table)
    }

    pub fn write_bytes(&self, out: &mut Vec<u8>) {
        out.reserve(PALETTE_TABLE_SIZE);
        for color in self.colors.iter() {
            out.extend_from_slice(&color.to_bytes());
        }
    }

    pub fn colors(&self) -> &[Color; PALETTE_ENTRIES] {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut [Color; PALETTE_ENTRIES] {
        &mut self.colors
    }

    pub fn get(&self, index: u8) -> Color {
        self.colors[index as usize]
    }
}

/// Number of palette tables that follow a header with these summary colors.
pub fn count_palettes(summary: &[Color]) -> usize {
    summary.iter().filter(|c| c.marks_palette()).count()
}
