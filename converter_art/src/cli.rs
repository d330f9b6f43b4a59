//! Command-line interface

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lib_art::constants::FILE_EXT;
use lib_art::{ArtError, ArtFile};
use log::{error, info, LevelFilter};

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

/// Convert ART sprite containers to indexed bitmaps and back
#[derive(Parser)]
#[command(name = "art-converter")]
#[command(version)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export every frame of an ART file as BASE_<frame>.bmp plus BASE.ini
    Unpack {
        /// ART file to read
        art: PathBuf,
        /// Output base path, without extension
        base: PathBuf,
    },
    /// Build an ART file from a sidecar and the bitmaps next to it
    Pack {
        /// Sidecar (.ini) written by `unpack`
        sidecar: PathBuf,
        /// ART file to write
        art: PathBuf,
    },
    /// Unpack when SRC ends in .art, pack otherwise
    Convert { src: PathBuf, dst: PathBuf },
    /// Print the container header and per-frame metadata
    Info {
        /// ART file to inspect
        art: PathBuf,
    },
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn is_art_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXT))
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    lib_art::init_logging(log_level(cli.verbose, cli.quiet));

    let result = match &cli.command {
        Commands::Unpack { art, base } => run_unpack(art, base),
        Commands::Pack { sidecar, art } => run_pack(sidecar, art),
        Commands::Convert { src, dst } => {
            if is_art_path(src) {
                run_unpack(src, dst)
            } else {
                run_pack(src, dst)
            }
        }
        Commands::Info { art } => run_info(art),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                // Reported plainly so scripts can match on it.
                ArtError::MissingSourceFile { .. } => eprintln!("{}", e),
                _ => error!("{}", e),
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run_unpack(art_path: &Path, base: &Path) -> Result<(), ArtError> {
    let art = ArtFile::load_art(art_path)?;
    art.save_bitmaps(base)?;
    info!(
        "Unpacked {} ({} frames) to {}",
        art_path.display(),
        art.frame_count(),
        base.display()
    );
    Ok(())
}

fn run_pack(sidecar: &Path, art_path: &Path) -> Result<(), ArtError> {
    let art = ArtFile::load_bitmaps(sidecar)?;
    art.save_art(art_path)?;
    info!(
        "Packed {} frames from {} into {}",
        art.frame_count(),
        sidecar.display(),
        art_path.display()
    );
    Ok(())
}

fn run_info(art_path: &Path) -> Result<(), ArtError> {
    let art = ArtFile::load_art(art_path)?;

    println!("{}", art_path.display());
    println!("  animated:  {}", art.is_animated());
    println!("  palettes:  {}", art.palette_count());
    println!(
        "  frames:    {} (stored count {})",
        art.frame_count(),
        art.header.frame_count
    );
    println!("  key frame: {}", art.key_frame());

    for (index, frame) in art.frames.iter().enumerate() {
        let header = frame.header();
        let stored_as = match header.pixel_count() {
            Some(pixels) if (header.size as usize) < pixels => "rle",
            _ => "raw",
        };
        let (center_x, center_y) = frame.center();
        let (offset_x, offset_y) = frame.offset();
        println!(
            "  frame {:>5}: {}x{} center=({}, {}) offset=({}, {}) payload={} bytes ({})",
            art.frame_label(index),
            frame.width(),
            frame.height(),
            center_x,
            center_y,
            offset_x,
            offset_y,
            header.size,
            stored_as
        );
    }
    Ok(())
}
