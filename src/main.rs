//! pixed - sprite bank, palette and tile map editor

use std::process::ExitCode;

use pixed::cli;

fn main() -> ExitCode {
    cli::run()
}
