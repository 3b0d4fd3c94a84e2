//! Worker error types.

use std::time::Duration;

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Nothing to select from: {0}")]
    EmptyInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Oracle call exceeded {0:?}")]
    OracleTimeout(Duration),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Oracle error: {0}")]
    Oracle(#[from] clipscout_oracle::OracleError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] clipscout_discovery::DiscoveryError),

    #[error("Media error: {0}")]
    Media(#[from] clipscout_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<clipscout_models::ModelError> for WorkerError {
    fn from(e: clipscout_models::ModelError) -> Self {
        Self::InputValidation(e.to_string())
    }
}

impl WorkerError {
    pub fn input_validation(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Errors that stop the whole run rather than one candidate.
    pub fn is_fatal_for_run(&self) -> bool {
        match self {
            WorkerError::Config(_) | WorkerError::Discovery(_) => true,
            WorkerError::Oracle(e) => matches!(e, clipscout_oracle::OracleError::Config(_)),
            WorkerError::Media(e) => matches!(e, clipscout_media::MediaError::Config(_)),
            _ => false,
        }
    }
}
