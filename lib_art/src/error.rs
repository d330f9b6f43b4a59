use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::bitmap::bmp::BitmapError;
use crate::bitmap::sidecar::SidecarError;
use crate::image::decoder::DecodeError;
use crate::image::encoder::EncodingError;

#[derive(Error, Debug)]
pub enum ArtError {
    #[error("Missing file: {}", .path.display())]
    MissingSourceFile { path: PathBuf },

    #[error("Malformed ART stream: {0}")]
    MalformedStream(#[from] DecodeError),

    #[error("Unsupported bitmap layout: {0}")]
    UnsupportedBitmapLayout(#[from] BitmapError),

    #[error("Malformed sidecar: {0}")]
    MalformedSidecar(#[from] SidecarError),

    #[error("Cannot encode container: {0}")]
    Encoding(#[from] EncodingError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ArtError {
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        ArtError::MissingSourceFile { path: path.into() }
    }
}
