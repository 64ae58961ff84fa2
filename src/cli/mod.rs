//! CLI module for mlquery
//!
//! Provides command-line interface for:
//! - derive: Derive a query as JSON
//! - explain: Derive a query and print it as a tree
//! - parse: Show how a method name is tokenized

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{derive, explain, load_context, parse, run, run_command, Config};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_error, write_response, write_text};
