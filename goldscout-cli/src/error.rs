//! CLI error type.

use thiserror::Error;

use goldscout::config::ConfigError;
use goldscout::grid::GridError;
use goldscout::logging::LoggingError;
use goldscout::plan::PlanError;
use goldscout::search::SearchError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad command-line or configuration input.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error("Failed to initialise logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("Failed to build grid: {0}")]
    Grid(#[from] GridError),

    #[error("Invalid plan: {0}")]
    Plan(#[from] PlanError),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::ConfigFile(_) | CliError::Plan(_) => 2,
            _ => 1,
        }
    }
}
