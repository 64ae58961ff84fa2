//! CLI-specific error types
//!
//! Derivation rejections are not CLI errors; they are reported in the
//! response body. These cover everything around a derivation.

use std::io;

use thiserror::Error;

use crate::mapping::MappingError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Entity definitions could not be loaded: {0}")]
    Mapping(#[from] MappingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "MLQ_CLI_CONFIG_ERROR",
            CliError::Io(_) => "MLQ_CLI_IO_ERROR",
            CliError::InvalidRequest(_) => "MLQ_CLI_INVALID_REQUEST",
            CliError::Mapping(_) => "MLQ_CLI_MAPPING_ERROR",
            CliError::Json(_) => "MLQ_CLI_IO_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
