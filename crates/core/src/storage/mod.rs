//! Document storage abstraction.
//!
//! [`DocumentRepository`] is the only I/O seam of the workspace. Backends
//! live in the `checkpost` (in-memory) and `checkpost_client` (HTTP) crates.

mod error;
mod http_mapping;
mod paging;
mod retry;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::status_code_to_repository_error;
pub use paging::list_all_documents;
pub use retry::{retry_with_delay, RetryPolicy};
pub use traits::DocumentRepository;
pub use types::{
    encode_data, Document, DocumentData, DocumentId, DocumentList, Filters, OrderBy, RangeFilter,
    SortDirection,
};
