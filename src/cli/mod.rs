//! CLI module for valdac
//!
//! Provides command-line interface for:
//! - check: Load and resolve every record definition
//! - schema: Print a record's schema document
//! - validate: Validate one JSON instance from stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, schema, validate};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_response};
