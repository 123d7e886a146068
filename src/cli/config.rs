//! Configuration file
//!
//! ```json
//! { "definitions_dir": "./definitions", "numeric_tower": false, "log_level": "INFO" }
//! ```
//!
//! A relative `definitions_dir` is taken relative to the config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;
use crate::schema::ConformanceChecker;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of definition files (required)
    pub definitions_dir: PathBuf,

    /// Accept int where float is declared (optional, default false)
    #[serde(default)]
    pub numeric_tower: bool,

    /// Lowest logged severity (optional, default "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if config.definitions_dir.is_relative() {
            if let Some(base) = path.parent() {
                config.definitions_dir = base.join(&config.definitions_dir);
            }
        }

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> CliResult<()> {
        if self.definitions_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("definitions_dir must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Conformance checker matching `numeric_tower`
    pub fn checker(&self) -> ConformanceChecker {
        if self.numeric_tower {
            ConformanceChecker::with_numeric_tower()
        } else {
            ConformanceChecker::new()
        }
    }
}
