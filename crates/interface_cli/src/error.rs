//! CLI error handling

use serde::Serialize;
use thiserror::Error;

use app_quote::QuoteError;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    Usage(String),

    #[error("Cannot read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario: {0}")]
    Scenario(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Error body printed on failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// True when retrying the same command may succeed
    pub retryable: bool,
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Io { .. } | CliError::Scenario(_) | CliError::Config(_) => 3,
            CliError::Quote(_) => 1,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, retryable) = match self {
            CliError::Usage(_) => ("usage", false),
            CliError::Io { .. } => ("io_error", false),
            CliError::Scenario(_) => ("invalid_scenario", false),
            CliError::Config(_) => ("config_error", false),
            CliError::Quote(e) => (e.code(), e.is_transient()),
        };

        ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
            retryable,
        }
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let message = rendered.trim_start_matches("error: ").trim_end();
        CliError::Usage(message.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Scenario(err.to_string())
    }
}
