pub mod rle;

use log::{debug, warn};

use crate::image::frame::Frame;
pub use rle::RleDecompressionError;

/// Encoded bytes of one frame.
///
/// The file carries no tag for this: a payload shorter than width * height is
/// run-length encoded, anything else is the raw image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Compressed(Vec<u8>),
    Raw(Vec<u8>),
}

impl Payload {
    /// Tags stored bytes the same way the decoder interprets them.
    pub fn classify(data: Vec<u8>, pixel_count: usize) -> Self {
        if data.len() < pixel_count {
            Payload::Compressed(data)
        } else {
            Payload::Raw(data)
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Payload::Compressed(data) | Payload::Raw(data) => data,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Compressed(data) | Payload::Raw(data) => data,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, Payload::Compressed(_))
    }
}

/// Encodes a frame, keeping whichever of the RLE and raw streams is shorter.
///
/// Ties go to the raw stream, so the payload never exceeds width * height and
/// always classifies back to the form it was written in.
pub fn compress(frame: &Frame) -> Payload {
    let compressed = rle::rle_compression(frame);
    let raw = rle::raw_stream(frame);
    debug!(
        "Frame {}x{}: rle {} bytes, raw {} bytes",
        frame.width(),
        frame.height(),
        compressed.len(),
        raw.len()
    );

    if raw.len() <= compressed.len() {
        Payload::Raw(raw)
    } else {
        Payload::Compressed(compressed)
    }
}

/// Fills `frame`'s grid from a payload. The grid must already have its final size.
pub fn decompress(payload: &Payload, frame: &mut Frame) -> Result<(), RleDecompressionError> {
    let expected = frame.pixels().len();
    let written = match payload {
        Payload::Compressed(data) => rle::rle_decompression(data, frame)?,
        Payload::Raw(data) => {
            if data.len() > expected {
                warn!(
                    "Raw payload holds {} bytes for {} pixels, ignoring the excess",
                    data.len(),
                    expected
                );
            }
            rle::raw_decompression(data, frame)
        }
    };

    if written < expected {
        warn!(
            "Payload covered {} of {} pixels, the rest stay 0",
            written, expected
        );
    }
    Ok(())
}
