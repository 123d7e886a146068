//! CLI command implementations
//!
//! Every command follows the same sequence:
//! 1. Configuration load
//! 2. Definition load into a fresh catalog
//! 3. Command work, producing one JSON response on stdout
//!
//! REJECT schema errors are answers and go to stdout as error responses.
//! Everything else is returned as a `CliError`.

use std::path::Path;

use serde_json::{json, Value};

use super::args::Command;
use super::config::Config;
use super::errors::CliResult;
use super::io::{error_response, ok_response, read_request, violations_response, write_response};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{Catalog, DefinitionLoader, RecordValidator, SchemaResult, SchemaSynthesizer};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command).inspect_err(|e| {
        log_event_with_fields(Event::CommandFailed, &[("code", e.code_str())]);
    })
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let response = match cmd {
        Command::Check { config } => check(&config)?,
        Command::Schema { config, record } => schema(&config, &record)?,
        Command::Validate {
            config,
            record,
            all,
        } => {
            let input = read_request()?;
            validate(&config, &record, all, &input)?
        }
    };
    write_response(&response)
}

/// Loads and resolves every record definition
///
/// Responds with the resolved record names.
pub fn check(config_path: &Path) -> CliResult<Value> {
    let config = boot(config_path)?;
    respond(load_catalog(&config).and_then(|catalog| {
        let records = catalog.check_all()?;
        Ok(ok_response(json!({ "records": records })))
    }))
}

/// Responds with the schema document of `record`
pub fn schema(config_path: &Path, record: &str) -> CliResult<Value> {
    let config = boot(config_path)?;
    respond(load_catalog(&config).and_then(|catalog| {
        let document = SchemaSynthesizer::new(&catalog).synthesize(record)?;
        Ok(ok_response(document.to_json()))
    }))
}

/// Validates one JSON instance of `record`
///
/// With `all`, every violation is reported instead of the first.
pub fn validate(config_path: &Path, record: &str, all: bool, input: &Value) -> CliResult<Value> {
    let config = boot(config_path)?;
    respond(load_catalog(&config).and_then(|catalog| {
        let validator = RecordValidator::with_checker(&catalog, config.checker());
        let instance = catalog.record_from_json(record, input)?;
        if all {
            let violations = validator.violations(&instance)?;
            if violations.is_empty() {
                Ok(ok_response(Value::Null))
            } else {
                Ok(violations_response(record, &violations))
            }
        } else {
            validator.validate(&instance)?;
            Ok(ok_response(Value::Null))
        }
    }))
}

/// Turns REJECT schema errors into error responses; FATAL ones stay errors.
fn respond(outcome: SchemaResult<Value>) -> CliResult<Value> {
    match outcome {
        Ok(response) => Ok(response),
        Err(err) if err.is_fatal() => Err(err.into()),
        Err(err) => Ok(error_response(&err)),
    }
}

fn boot(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_threshold(config.severity()?);

    let config_display = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", config_display.as_str())]);

    Ok(config)
}

fn load_catalog(config: &Config) -> SchemaResult<Catalog> {
    let catalog = Catalog::new();
    DefinitionLoader::new(&config.definitions_dir).load_into(&catalog)?;
    Ok(catalog)
}
