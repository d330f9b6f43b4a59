use log::{error, info};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::format::ArtFile;
use super::{decode, encode};
use crate::error::ArtError;

impl ArtFile {
    /// Reads and decodes an ART file.
    pub fn load_art(path: impl AsRef<Path>) -> Result<Self, ArtError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            error!("Cannot open {}: {}", path.display(), e);
            ArtError::missing(path)
        })?;

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        info!("Loading {} ({} bytes)", path.display(), buffer.len());

        Ok(decode(&buffer)?)
    }

    /// Encodes the container and writes it to `path`.
    ///
    /// Nothing is created on disk if encoding fails.
    pub fn save_art(&self, path: impl AsRef<Path>) -> Result<(), ArtError> {
        let path = path.as_ref();
        let encoded_data = encode(self)?;

        let mut file = File::create(path)?;
        file.write_all(&encoded_data)?;
        info!("Saved {} ({} bytes)", path.display(), encoded_data.len());
        Ok(())
    }
}
