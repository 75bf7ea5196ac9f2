//! Client error types.

use thiserror::Error;

use checkpost_core::storage::{status_code_to_repository_error, RepositoryError};

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Converts a failure on `collection` (and document `id`, empty for list
    /// requests) into the repository error the store and service understand.
    pub fn into_repository_error(self, collection: &str, id: &str) -> RepositoryError {
        match self {
            Self::ServerError { status, message } => {
                status_code_to_repository_error(status, collection, id, message)
            }
            Self::Request(err) if err.is_timeout() || err.is_connect() => {
                RepositoryError::ConnectionFailed(err.to_string())
            }
            Self::Request(err) => RepositoryError::QueryFailed(err.to_string()),
            Self::Json(err) => RepositoryError::Serialization(err.to_string()),
            Self::Config(message) => RepositoryError::InvalidData(message),
        }
    }
}
