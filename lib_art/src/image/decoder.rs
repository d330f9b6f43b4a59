use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::color::PaletteTable;
use super::format::{ArtFile, ArtHeader};
use super::frame::{Frame, FrameHeader};
use crate::compression::{decompress, Payload, RleDecompressionError};
use crate::constants::{
    ART_HEADER_SIZE, FRAME_HEADER_SIZE, MAX_FRAME_PIXELS, MAX_RUN, PALETTE_TABLE_SIZE,
};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unexpected end of data while reading {section}: need {needed} bytes, {available} left")]
    UnexpectedEof {
        section: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("Declared {section} count {count} is too large")]
    CountOverflow { section: &'static str, count: usize },
    #[error("Frame #{index} is {width}x{height}, above the supported pixel count")]
    FrameTooLarge { index: usize, width: u32, height: u32 },
    #[error("Frame #{index} declares {pixels} pixels but its {size}-byte payload can expand to at most {max}")]
    PayloadTooShort {
        index: usize,
        pixels: usize,
        size: u32,
        max: usize,
    },
    #[error("Failed to parse {section}")]
    Layout {
        section: &'static str,
        source: bincode::Error,
    },
    #[error("Frame #{index} payload is corrupt")]
    DecompressionFailed {
        index: usize,
        source: RleDecompressionError,
    },
}

/// Slice reader that refuses to go past the end.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize, section: &'static str) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            error!(
                "Stream ends inside {}: need {} bytes at offset {}, {} left",
                section,
                len,
                self.pos,
                self.remaining()
            );
            return Err(DecodeError::UnexpectedEof {
                section,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

fn parse<T: DeserializeOwned>(bytes: &[u8], section: &'static str) -> Result<T, DecodeError> {
    bincode::deserialize(bytes).map_err(|source| DecodeError::Layout { section, source })
}

fn section_len(count: usize, item_size: usize, section: &'static str) -> Result<usize, DecodeError> {
    count
        .checked_mul(item_size)
        .ok_or(DecodeError::CountOverflow { section, count })
}

/// Most pixels an RLE payload of `len` bytes can describe: one full clone run
/// per two bytes.
fn max_rle_pixels(len: usize) -> usize {
    (len / 2).saturating_mul(MAX_RUN as usize)
}

/// Parses a complete ART stream and decodes every frame.
pub fn decode(encoded_data: &[u8]) -> Result<ArtFile, DecodeError> {
    let mut reader = Reader::new(encoded_data);

    let header: ArtHeader = parse(reader.take(ART_HEADER_SIZE, "header")?, "header")?;
    let palette_count = header.palette_count();
    let frame_count = header
        .logical_frame_count()
        .ok_or(DecodeError::CountOverflow {
            section: "frame",
            count: header.frame_count as usize,
        })?;
    debug!(
        "Header read: animated={} palettes={} frames={} key_frame={}",
        header.is_animated(),
        palette_count,
        frame_count,
        header.frame_count_low
    );

    let mut art = ArtFile::new(header);

    let palette_len = section_len(palette_count, PALETTE_TABLE_SIZE, "palette")?;
    let palette_data = reader.take(palette_len, "palette tables")?;
    for chunk in palette_data.chunks_exact(PALETTE_TABLE_SIZE) {
        let table = PaletteTable::from_bytes(chunk).ok_or(DecodeError::UnexpectedEof {
            section: "palette tables",
            needed: PALETTE_TABLE_SIZE,
            available: chunk.len(),
        })?;
        art.palettes.push(table);
    }
    debug!("Read {} palette tables", art.palettes.len());

    let headers_len = section_len(frame_count, FRAME_HEADER_SIZE, "frame")?;
    let header_data = reader.take(headers_len, "frame headers")?;
    let mut frame_headers = Vec::with_capacity(frame_count);
    for chunk in header_data.chunks_exact(FRAME_HEADER_SIZE) {
        let frame_header: FrameHeader = parse(chunk, "frame header")?;
        frame_headers.push(frame_header);
    }

    art.frames.reserve(frame_count);
    for (index, frame_header) in frame_headers.into_iter().enumerate() {
        let pixel_count = frame_header
            .pixel_count()
            .filter(|&count| count <= MAX_FRAME_PIXELS)
            .ok_or(DecodeError::FrameTooLarge {
                index,
                width: frame_header.width,
                height: frame_header.height,
            })?;

        let data = reader.take(frame_header.size as usize, "frame payload")?;
        let payload = Payload::classify(data.to_vec(), pixel_count);
        debug!(
            "Frame #{}: {}x{} center=({}, {}) offset=({}, {}) payload={} bytes ({})",
            index,
            frame_header.width,
            frame_header.height,
            frame_header.center_x,
            frame_header.center_y,
            frame_header.offset_x,
            frame_header.offset_y,
            frame_header.size,
            if payload.is_compressed() { "rle" } else { "raw" }
        );

        // A grid is only allocated when its payload could fill it.
        if payload.is_compressed() && pixel_count > max_rle_pixels(payload.len()) {
            error!(
                "Frame #{}: {} pixels cannot come from a {}-byte payload",
                index, pixel_count, frame_header.size
            );
            return Err(DecodeError::PayloadTooShort {
                index,
                pixels: pixel_count,
                size: frame_header.size,
                max: max_rle_pixels(payload.len()),
            });
        }

        let mut frame = Frame::from_header(frame_header);
        decompress(&payload, &mut frame)
            .map_err(|source| DecodeError::DecompressionFailed { index, source })?;
        art.frames.push(frame);
    }

    if reader.remaining() > 0 {
        warn!(
            "Ignoring {} trailing bytes after the last frame",
            reader.remaining()
        );
    }

    info!(
        "Decoded ART container: {} palettes, {} frames",
        art.palettes.len(),
        art.frames.len()
    );
    Ok(art)
}
