//! Oracle error types.

use thiserror::Error;

pub type OracleResult<T> = Result<T, OracleError>;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle configuration error: {0}")]
    Config(String),

    #[error("Oracle request failed: {0}")]
    RequestFailed(String),

    #[error("Oracle rate limited: {0}")]
    RateLimited(String),

    #[error("Oracle server error {0}: {1}")]
    ServerError(u16, String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl OracleError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            429 => Self::RateLimited(body),
            500..=599 => Self::ServerError(status, body),
            _ => Self::RequestFailed(format!("status {}: {}", status, body)),
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OracleError::Network(_) | OracleError::RateLimited(_) | OracleError::ServerError(..)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert!(matches!(
            OracleError::from_http_status(429, "slow down"),
            OracleError::RateLimited(_)
        ));
        assert!(matches!(
            OracleError::from_http_status(503, "unavailable"),
            OracleError::ServerError(503, _)
        ));
        assert!(matches!(
            OracleError::from_http_status(401, "bad key"),
            OracleError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_retryable_classes() {
        assert!(OracleError::from_http_status(500, "").is_retryable());
        assert!(OracleError::from_http_status(429, "").is_retryable());
        assert!(!OracleError::from_http_status(400, "").is_retryable());
        assert!(!OracleError::config("missing key").is_retryable());
    }
}
