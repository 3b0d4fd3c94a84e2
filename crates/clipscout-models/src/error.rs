//! Model validation errors.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid fragment #{index}: {message}")]
    InvalidFragment { index: usize, message: String },
}

impl ModelError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_fragment(index: usize, msg: impl Into<String>) -> Self {
        Self::InvalidFragment {
            index,
            message: msg.into(),
        }
    }
}
