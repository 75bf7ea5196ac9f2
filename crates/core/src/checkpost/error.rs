use thiserror::Error;

/// Errors raised while validating checkpost write requests.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckpostError {
    #[error("Checkpost name cannot be empty")]
    EmptyName,
    #[error("Checkpost ID is required")]
    MissingCheckpostId,
    #[error("Daily log ID is required")]
    MissingLogId,
    #[error("Latitude out of range: {0}")]
    InvalidLatitude(f64),
    #[error("Longitude out of range: {0}")]
    InvalidLongitude(f64),
    #[error("Seized item name cannot be empty")]
    EmptySeizedItemName,
    #[error("Failed to encode seized items: {0}")]
    Encoding(String),
}
