//! Text sidecar that carries everything a bitmap cannot: header words, palette
//! tables and per-frame anchors and offsets.
//!
//! Lines end in CRLF. Every 32-bit value is written as eight uppercase hex
//! digits, least significant nibble first, followed by a space. Colors pack
//! into such a value as `a << 24 | b << 16 | g << 8 | r`.

use std::fmt::Write as _;
use std::str::{FromStr, SplitWhitespace};

use log::{debug, warn};
use thiserror::Error;

use crate::constants::{DIRECTIONS, MAX_PALETTES, PALETTE_ENTRIES};
use crate::image::color::{Color, PaletteTable};
use crate::image::format::{ArtFile, ArtHeader};
use crate::image::frame::Frame;

const LINE_END: &str = "\r\n";
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SidecarError {
    #[error("sidecar is not valid UTF-8 text")]
    NotText,
    #[error("sidecar ends while expecting {0}")]
    UnexpectedEnd(String),
    #[error("expected `{expected}`, found `{found}`")]
    UnexpectedToken { expected: String, found: String },
    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
    #[error("`{0}` is not an 8-digit hex value")]
    InvalidHex(String),
    #[error("{0} palettes declared, at most 4 are supported")]
    TooManyPalettes(usize),
}

/// Appends `value` in the sidecar's nibble-reversed hex form, trailing space included.
pub fn write_dword(out: &mut String, value: u32) {
    for nibble in 0..8 {
        let digit = (value >> (nibble * 4)) & 0xF;
        out.push(HEX_DIGITS[digit as usize] as char);
    }
    out.push(' ');
}

/// Parses one nibble-reversed hex token. Either letter case is accepted.
pub fn parse_dword(token: &str) -> Result<u32, SidecarError> {
    if token.len() != 8 {
        return Err(SidecarError::InvalidHex(token.to_string()));
    }
    let mut value = 0u32;
    for (nibble, ch) in token.chars().enumerate() {
        let digit = ch
            .to_digit(16)
            .ok_or_else(|| SidecarError::InvalidHex(token.to_string()))?;
        value |= digit << (nibble * 4);
    }
    Ok(value)
}

pub fn color_to_dword(color: Color) -> u32 {
    (color.a as u32) << 24 | (color.b as u32) << 16 | (color.g as u32) << 8 | color.r as u32
}

pub fn dword_to_color(value: u32) -> Color {
    Color {
        r: value as u8,
        g: (value >> 8) as u8,
        b: (value >> 16) as u8,
        a: (value >> 24) as u8,
    }
}

fn write_color(out: &mut String, color: Color) {
    write_dword(out, color_to_dword(color));
}

/// Renders the sidecar for a container.
pub fn write_sidecar(art: &ArtFile) -> String {
    let header = &art.header;
    let mut out = String::new();

    // fmt::Write into a String cannot fail.
    let _ = write!(out, "frames: {}{LINE_END}", art.frames.len());
    let _ = write!(out, "key_frame: {}{LINE_END}", art.key_frame());
    let _ = write!(out, "palettes: {}{LINE_END}", art.palettes.len());

    out.push_str("header: ");
    out.push_str(LINE_END);
    for &word in &header.words {
        write_dword(&mut out, word);
    }
    for &marker in &header.palette_markers {
        write_color(&mut out, marker);
    }
    for bank in &header.reserved_banks {
        for &color in bank {
            write_color(&mut out, color);
        }
    }
    out.push_str(LINE_END);

    for (index, table) in art.palettes.iter().enumerate() {
        let _ = write!(out, "palette {index}:{LINE_END}");
        for &color in table.colors() {
            write_color(&mut out, color);
            out.push_str(LINE_END);
        }
    }

    for (index, frame) in art.frames.iter().enumerate() {
        let header = frame.header();
        let _ = write!(out, "frame {}:{LINE_END}", art.frame_label(index));
        let _ = write!(out, "center_x: {}{LINE_END}", header.center_x);
        let _ = write!(out, "center_y: {}{LINE_END}", header.center_y);
        let _ = write!(out, "offset_x: {}{LINE_END}", header.offset_x);
        let _ = write!(out, "offset_y: {}{LINE_END}", header.offset_y);
    }

    out
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn next(&mut self, expected: &str) -> Result<&'a str, SidecarError> {
        self.inner
            .next()
            .ok_or_else(|| SidecarError::UnexpectedEnd(expected.to_string()))
    }

    fn expect_key(&mut self, key: &str) -> Result<(), SidecarError> {
        let token = self.next(key)?;
        if token != key {
            return Err(SidecarError::UnexpectedToken {
                expected: key.to_string(),
                found: token.to_string(),
            });
        }
        Ok(())
    }

    /// Consumes a `label:` token such as `3:` or `0_7:`.
    fn label(&mut self) -> Result<&'a str, SidecarError> {
        let token = self.next("a label")?;
        token
            .strip_suffix(':')
            .ok_or_else(|| SidecarError::UnexpectedToken {
                expected: "<label>:".to_string(),
                found: token.to_string(),
            })
    }

    fn number<T: FromStr>(&mut self, key: &str) -> Result<T, SidecarError> {
        self.expect_key(key)?;
        let token = self.next(key)?;
        token
            .parse()
            .map_err(|_| SidecarError::InvalidNumber(token.to_string()))
    }

    fn dword(&mut self) -> Result<u32, SidecarError> {
        parse_dword(self.next("a hex value")?)
    }

    fn color(&mut self) -> Result<Color, SidecarError> {
        self.dword().map(dword_to_color)
    }
}

/// Parses a sidecar into a container whose frames carry anchors and offsets
/// but empty grids; the pixels come from the bitmaps.
pub fn parse_sidecar(text: &str) -> Result<ArtFile, SidecarError> {
    let mut tokens = Tokens::new(text);

    let frame_count: usize = tokens.number("frames:")?;
    let key_frame: u32 = tokens.number("key_frame:")?;
    let palette_count: usize = tokens.number("palettes:")?;
    if palette_count > MAX_PALETTES {
        return Err(SidecarError::TooManyPalettes(palette_count));
    }

    tokens.expect_key("header:")?;
    let mut header = ArtHeader::default();
    for word in header.words.iter_mut() {
        *word = tokens.dword()?;
    }
    for marker in header.palette_markers.iter_mut() {
        *marker = tokens.color()?;
    }
    for bank in header.reserved_banks.iter_mut() {
        for color in bank.iter_mut() {
            *color = tokens.color()?;
        }
    }
    header.frame_count_low = key_frame;
    header.frame_count = if header.is_animated() {
        if frame_count % DIRECTIONS != 0 {
            warn!(
                "Animated sidecar lists {} frames, not a multiple of {}",
                frame_count, DIRECTIONS
            );
        }
        (frame_count / DIRECTIONS) as u32
    } else {
        frame_count as u32
    };
    debug!(
        "Sidecar header: animated={} frames={} key_frame={} palettes={}",
        header.is_animated(),
        frame_count,
        key_frame,
        palette_count
    );

    let mut art = ArtFile::new(header);

    for _ in 0..palette_count {
        tokens.expect_key("palette")?;
        tokens.label()?;
        let mut colors = [Color::default(); PALETTE_ENTRIES];
        for color in colors.iter_mut() {
            *color = tokens.color()?;
        }
        art.palettes.push(PaletteTable::new(colors));
    }

    for _ in 0..frame_count {
        tokens.expect_key("frame")?;
        let label = tokens.label()?;
        let mut frame = Frame::default();
        let center_x = tokens.number("center_x:")?;
        let center_y = tokens.number("center_y:")?;
        let offset_x = tokens.number("offset_x:")?;
        let offset_y = tokens.number("offset_y:")?;
        frame.set_center(center_x, center_y);
        frame.set_offset(offset_x, offset_y);
        debug!(
            "Sidecar frame {}: center=({}, {}) offset=({}, {})",
            label, center_x, center_y, offset_x, offset_y
        );
        art.frames.push(frame);
    }

    Ok(art)
}
