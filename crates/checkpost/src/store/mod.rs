//! Session-scoped aggregation store.

mod checkposts;
mod single_flight;
mod snapshot;

pub use checkposts::CheckpostListStore;
pub use snapshot::{LoadState, StoreSnapshot};
