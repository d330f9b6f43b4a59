use serde::{Deserialize, Serialize};

use super::color::{count_palettes, Color, PaletteTable};
use super::frame::Frame;
use crate::constants::{DIRECTIONS, MAX_PALETTES, RESERVED_BANKS, RESERVED_BANK_COLORS};

/// Fixed 132-byte block at the start of every ART file.
///
/// The three leading words and the reserved banks have no known meaning and
/// are carried through untouched.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArtHeader {
    pub words: [u32; 3],
    /// One per palette slot; non-zero means a table follows.
    pub palette_markers: [Color; MAX_PALETTES],
    /// Also read as the key frame index.
    pub frame_count_low: u32,
    /// Stored frame count, before the x8 applied to animated containers.
    pub frame_count: u32,
    pub reserved_banks: [[Color; RESERVED_BANK_COLORS]; RESERVED_BANKS],
}

impl ArtHeader {
    pub fn is_animated(&self) -> bool {
        self.words[0] & 0x1 == 0
    }

    pub fn palette_count(&self) -> usize {
        count_palettes(&self.palette_markers)
    }

    /// Number of frames the stream actually holds, or `None` on overflow.
    pub fn logical_frame_count(&self) -> Option<usize> {
        let stored = self.frame_count as usize;
        if self.is_animated() {
            stored.checked_mul(DIRECTIONS)
        } else {
            Some(stored)
        }
    }
}

/// A decoded sprite container: header, palettes and frames.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtFile {
    pub header: ArtHeader,
    pub palettes: Vec<PaletteTable>,
    pub frames: Vec<Frame>,
}

impl ArtFile {
    pub fn new(header: ArtHeader) -> Self {
        Self {
            header,
            palettes: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Animated containers hold eight directional variants per logical frame.
    pub fn is_animated(&self) -> bool {
        self.header.is_animated()
    }

    pub fn key_frame(&self) -> u32 {
        self.header.frame_count_low
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn palette_count(&self) -> usize {
        self.palettes.len()
    }

    pub fn palette(&self, index: usize) -> Option<&PaletteTable> {
        self.palettes.get(index)
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Name fragment for frame `index` in exported file names: `7`, or `07`
    /// (group 0, direction 7) when animated.
    pub fn frame_tag(&self, index: usize) -> String {
        if self.is_animated() {
            format!("{}{}", index / DIRECTIONS, index % DIRECTIONS)
        } else {
            index.to_string()
        }
    }

    /// Frame label used in the sidecar: `7`, or `0_7` when animated.
    pub fn frame_label(&self, index: usize) -> String {
        if self.is_animated() {
            format!("{}_{}", index / DIRECTIONS, index % DIRECTIONS)
        } else {
            index.to_string()
        }
    }
}
