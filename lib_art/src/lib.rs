//! Codec for the legacy ART sprite container.
//!
//! An ART file holds up to four 256-color palettes and a list of 8-bit indexed
//! frames, each stored with a small run-length scheme. This crate reads and
//! writes that binary layout and converts containers to and from a set of
//! indexed BMP files plus an `.ini` text sidecar, so frames can be edited in
//! ordinary paint tools and packed back.
//!
//! ```no_run
//! use lib_art::ArtFile;
//!
//! let art = ArtFile::load_art("critter.art")?;
//! art.save_bitmaps("out/critter")?;
//!
//! let edited = ArtFile::load_bitmaps("out/critter.ini")?;
//! edited.save_art("critter_new.art")?;
//! # Ok::<(), lib_art::ArtError>(())
//! ```

pub mod bitmap;
pub mod compression;
pub mod constants;
pub mod error;
pub mod image;

use log::*;
use std::io::Write;

pub use crate::compression::{compress, decompress, Payload};
pub use crate::error::ArtError;
pub use crate::image::color::{Color, PaletteTable};
pub use crate::image::format::{ArtFile, ArtHeader};
pub use crate::image::frame::{Frame, FrameHeader};
pub use crate::image::{decode, encode};

/// Routes `log` output to stderr as `[LEVEL file:line] message`.
///
/// `level` applies to this crate and the converter binary. `RUST_LOG`, when
/// set, is parsed afterwards and wins.
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter(None, LevelFilter::Warn)
        .filter(Some("lib_art"), level)
        .filter(Some("art_converter"), level)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .try_init();
}
