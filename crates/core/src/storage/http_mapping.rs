//! Pure mapping from HTTP status codes to repository errors.
//!
//! Remote backends report failures as status codes; this module turns them
//! into [`RepositoryError`] variants with no side effects.

use super::RepositoryError;

/// Maps a failed HTTP response for a document in `collection` to a
/// [`RepositoryError`].
///
/// `id` names the document when the request addressed one, and is empty for
/// list requests.
///
/// # Examples
///
/// ```
/// use checkpost_core::storage::{status_code_to_repository_error, RepositoryError};
///
/// let error = status_code_to_repository_error(404, "checkposts", "abc-123", String::new());
/// assert_eq!(error, RepositoryError::not_found("checkposts", "abc-123"));
/// ```
pub fn status_code_to_repository_error(
    status: u16,
    collection: &str,
    id: &str,
    message: String,
) -> RepositoryError {
    match status {
        404 => RepositoryError::not_found(collection, id),
        409 => RepositoryError::already_exists(collection, id),
        400 => RepositoryError::InvalidData(message),
        408 | 502 | 503 | 504 => RepositoryError::ConnectionFailed(message),
        _ => RepositoryError::QueryFailed(format!("{status}: {message}")),
    }
}
