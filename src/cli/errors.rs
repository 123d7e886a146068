//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::io;

use thiserror::Error;

use crate::schema::SchemaError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("VALDAC_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    #[error("VALDAC_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("VALDAC_CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("VALDAC_CLI_IO_ERROR: {0}")]
    Input(String),

    #[error("{0}")]
    Schema(#[from] SchemaError),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Bad stdin input
    pub fn input_error(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Config(_) => "VALDAC_CLI_CONFIG_ERROR",
            Self::Io(_) | Self::Json(_) | Self::Input(_) => "VALDAC_CLI_IO_ERROR",
            Self::Schema(e) => e.code().code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CliError::config_error("x").code_str(), "VALDAC_CLI_CONFIG_ERROR");
        assert_eq!(CliError::input_error("x").code_str(), "VALDAC_CLI_IO_ERROR");
        let schema = CliError::from(SchemaError::unknown_record("Ghost"));
        assert_eq!(schema.code_str(), "VALDAC_UNKNOWN_RECORD");
    }

    #[test]
    fn test_display_carries_code() {
        let err = CliError::config_error("definitions_dir must not be empty");
        assert_eq!(
            err.to_string(),
            "VALDAC_CLI_CONFIG_ERROR: definitions_dir must not be empty"
        );
    }
}
