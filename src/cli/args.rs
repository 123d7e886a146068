//! CLI argument definitions using clap
//!
//! Commands:
//! - valdac check --config <path>
//! - valdac schema --config <path> --record <name>
//! - valdac validate --config <path> --record <name> [--all]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// valdac - record validation and schema synthesis
#[derive(Parser, Debug)]
#[command(name = "valdac")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load every definition and resolve every record
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./valdac.json")]
        config: PathBuf,
    },

    /// Print the schema document of a record
    Schema {
        /// Path to configuration file
        #[arg(long, default_value = "./valdac.json")]
        config: PathBuf,

        /// Record type name
        #[arg(long)]
        record: String,
    },

    /// Validate one JSON instance read from stdin
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./valdac.json")]
        config: PathBuf,

        /// Record type name
        #[arg(long)]
        record: String,

        /// Report every violation instead of the first
        #[arg(long)]
        all: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
