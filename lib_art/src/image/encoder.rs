use log::{debug, error, info};
use thiserror::Error;

use super::format::{ArtFile, ArtHeader};
use crate::compression::compress;
use crate::constants::DIRECTIONS;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Header marks {declared} palette slots but the container holds {actual} tables")]
    PaletteCountMismatch { declared: usize, actual: usize },
    #[error("Animated container holds {0} frames, not a multiple of 8")]
    FrameCountNotDirectional(usize),
    #[error("{section} value {value} does not fit in 32 bits")]
    ValueOutOfRange { section: &'static str, value: usize },
    #[error("Failed to serialize {section}")]
    Serialization {
        section: &'static str,
        source: bincode::Error,
    },
}

fn to_u32(value: usize, section: &'static str) -> Result<u32, EncodingError> {
    u32::try_from(value).map_err(|_| EncodingError::ValueOutOfRange { section, value })
}

/// Header as it will be written: the stored frame count is re-derived from the
/// frame list, dividing by 8 for animated containers.
pub fn header_for_write(art: &ArtFile) -> Result<ArtHeader, EncodingError> {
    let mut header = art.header;

    let declared = header.palette_count();
    if declared != art.palettes.len() {
        error!(
            "Palette markers declare {} tables, container holds {}",
            declared,
            art.palettes.len()
        );
        return Err(EncodingError::PaletteCountMismatch {
            declared,
            actual: art.palettes.len(),
        });
    }

    let frames = art.frames.len();
    let stored = if header.is_animated() {
        if frames % DIRECTIONS != 0 {
            error!("Animated container has {} frames", frames);
            return Err(EncodingError::FrameCountNotDirectional(frames));
        }
        frames / DIRECTIONS
    } else {
        frames
    };
    header.frame_count = to_u32(stored, "frame count")?;

    Ok(header)
}

/// Serializes a container into the ART layout, re-encoding every frame.
pub fn encode(art: &ArtFile) -> Result<Vec<u8>, EncodingError> {
    info!("Starting ART encoding");

    let header = header_for_write(art)?;
    let mut encoded_data = Vec::new();

    // Step 1: Header
    bincode::serialize_into(&mut encoded_data, &header).map_err(|source| {
        EncodingError::Serialization {
            section: "header",
            source,
        }
    })?;
    debug!(
        "Header written: animated={} stored frame count={} key_frame={}",
        header.is_animated(),
        header.frame_count,
        header.frame_count_low
    );

    // Step 2: Palette tables
    for table in &art.palettes {
        table.write_bytes(&mut encoded_data);
    }
    debug!("Palette data written with {} tables", art.palettes.len());

    // Step 3: Frame headers, each carrying its fresh payload size
    let mut payloads = Vec::with_capacity(art.frames.len());
    for (index, frame) in art.frames.iter().enumerate() {
        let payload = compress(frame);
        let mut frame_header = *frame.header();
        frame_header.size = to_u32(payload.len(), "payload size")?;

        bincode::serialize_into(&mut encoded_data, &frame_header).map_err(|source| {
            EncodingError::Serialization {
                section: "frame header",
                source,
            }
        })?;
        debug!(
            "Frame #{} encoded: {}x{} into {} bytes ({})",
            index,
            frame_header.width,
            frame_header.height,
            frame_header.size,
            if payload.is_compressed() { "rle" } else { "raw" }
        );
        payloads.push(payload);
    }

    // Step 4: Payloads, in frame order
    for payload in &payloads {
        encoded_data.extend_from_slice(payload.bytes());
    }

    info!(
        "ART encoding completed: {} bytes, {} frames",
        encoded_data.len(),
        art.frames.len()
    );
    Ok(encoded_data)
}
