use thiserror::Error;

use checkpost_core::checkpost::CheckpostError;
use checkpost_core::storage::RepositoryError;

/// Invalid or missing configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} cannot be empty")]
    Empty { name: &'static str },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Errors returned by the write and detail paths of the checkpost service.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("A daily log already exists for checkpost {checkpost_id} on {date}")]
    DuplicateDailyLog { checkpost_id: String, date: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<CheckpostError> for ServiceError {
    fn from(err: CheckpostError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
