//! Bitmap interchange: one 8-bit BMP per frame plus a text sidecar.
//!
//! For a base path `out/critter` the set is `out/critter.ini` and
//! `out/critter_<tag>.bmp`, where the tag is the frame index, or group and
//! direction digits run together for animated containers.

pub mod bmp;
pub mod sidecar;

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use self::sidecar::SidecarError;
use crate::constants::{BITMAP_EXT, SIDECAR_EXT};
use crate::error::ArtError;
use crate::image::color::PaletteTable;
use crate::image::format::ArtFile;
use crate::image::frame::Frame;

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub fn sidecar_path(base: &Path) -> PathBuf {
    with_suffix(base, &format!(".{SIDECAR_EXT}"))
}

pub fn bitmap_path(base: &Path, tag: &str) -> PathBuf {
    with_suffix(base, &format!("_{tag}.{BITMAP_EXT}"))
}

/// Base path the bitmaps were written under, given the sidecar's path.
pub fn base_from_sidecar(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(SIDECAR_EXT) => path.with_extension(""),
        _ => path.to_path_buf(),
    }
}

impl ArtFile {
    /// Writes the sidecar and one bitmap per frame under `base`.
    ///
    /// Bitmaps get the first palette as their color table, or a gray ramp
    /// when the container has none.
    pub fn save_bitmaps(&self, base: impl AsRef<Path>) -> Result<(), ArtError> {
        let base = base.as_ref();

        let sidecar = sidecar_path(base);
        fs::write(&sidecar, sidecar::write_sidecar(self))?;
        debug!("Wrote sidecar {}", sidecar.display());

        let gray;
        let palette = match self.palettes.first() {
            Some(table) => table,
            None => {
                warn!("Container has no palette, bitmaps get a gray ramp");
                gray = PaletteTable::grayscale();
                &gray
            }
        };

        for (index, frame) in self.frames.iter().enumerate() {
            let path = bitmap_path(base, &self.frame_tag(index));
            fs::write(&path, bmp::encode_bmp(frame, palette))?;
            debug!(
                "Wrote frame #{} ({}x{}) to {}",
                index,
                frame.width(),
                frame.height(),
                path.display()
            );
        }

        info!(
            "Exported {} frames to {}",
            self.frames.len(),
            base.display()
        );
        Ok(())
    }

    /// Rebuilds a container from a sidecar and the bitmaps next to it.
    ///
    /// A bitmap that cannot be read is replaced by a 6x6 zero frame; its
    /// anchor and offset still come from the sidecar.
    pub fn load_bitmaps(sidecar_path: impl AsRef<Path>) -> Result<Self, ArtError> {
        let sidecar_path = sidecar_path.as_ref();
        let mut file = File::open(sidecar_path).map_err(|e| {
            error!("Cannot open sidecar {}: {}", sidecar_path.display(), e);
            ArtError::missing(sidecar_path)
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            error!("Sidecar {} is not text: {}", sidecar_path.display(), e);
            SidecarError::NotText
        })?;
        let mut art = sidecar::parse_sidecar(&text)?;
        let base = base_from_sidecar(sidecar_path);

        for index in 0..art.frames.len() {
            let path = bitmap_path(&base, &art.frame_tag(index));
            let mut frame = match fs::read(&path) {
                Ok(data) => bmp::decode_bmp(&data).map_err(|e| {
                    error!("Bitmap {} rejected: {}", path.display(), e);
                    e
                })?,
                Err(e) => {
                    warn!(
                        "Bitmap {} unavailable ({}), using an empty frame",
                        path.display(),
                        e
                    );
                    Frame::placeholder()
                }
            };

            let (center_x, center_y) = art.frames[index].center();
            let (offset_x, offset_y) = art.frames[index].offset();
            frame.set_center(center_x, center_y);
            frame.set_offset(offset_x, offset_y);
            debug!(
                "Loaded frame #{} ({}x{}) from {}",
                index,
                frame.width(),
                frame.height(),
                path.display()
            );
            art.frames[index] = frame;
        }

        info!(
            "Imported {} frames and {} palettes from {}",
            art.frames.len(),
            art.palettes.len(),
            sidecar_path.display()
        );
        Ok(art)
    }
}
