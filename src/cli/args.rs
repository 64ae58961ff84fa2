//! CLI argument definitions using clap
//!
//! Commands:
//! - mlquery derive --config <path> --entity <name> --method <name>
//! - mlquery explain --config <path> --entity <name> --method <name>
//! - mlquery parse --method <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mlquery - derive document-store queries from repository method names
#[derive(Parser, Debug)]
#[command(name = "mlquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive a query; parameters are read from stdin as JSON
    Derive {
        /// Path to configuration file
        #[arg(long, default_value = "./mlquery.json")]
        config: PathBuf,

        /// Entity the repository method belongs to
        #[arg(long)]
        entity: String,

        /// Repository method name, e.g. findByLastnameAndAddressCountry
        #[arg(long)]
        method: String,
    },

    /// Derive a query and print it as an indented tree
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./mlquery.json")]
        config: PathBuf,

        #[arg(long)]
        entity: String,

        #[arg(long)]
        method: String,
    },

    /// Parse a method name without entity metadata
    Parse {
        #[arg(long)]
        method: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
