//! Traitforge - command-line tool for generating layered edition images and metadata

use std::process::ExitCode;

use traitforge::cli;

fn main() -> ExitCode {
    cli::run()
}
