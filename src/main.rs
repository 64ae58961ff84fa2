//! mlquery CLI entry point
//!
//! Parses arguments and dispatches to the CLI module; failures go to
//! stderr with a non-zero exit code.

use mlquery::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
