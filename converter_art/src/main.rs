//! art-converter - unpack ART sprite containers to bitmaps and pack them back

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
