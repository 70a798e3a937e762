use thiserror::Error;

use device_shots_lib::ShotError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Settings or catalog could not be loaded
    #[error("{0}")]
    Shot(#[from] ShotError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Crawler could not be set up
    #[error("Crawler error: {0}")]
    Crawler(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn crawler(msg: impl Into<String>) -> Self {
        Self::Crawler(msg.into())
    }
}
