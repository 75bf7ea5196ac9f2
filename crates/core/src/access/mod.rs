//! Row-level visibility of checkposts.
//!
//! This filter is advisory. The backing store's permissions remain the real
//! boundary.

mod operations;
mod types;

pub use operations::{filter_accessible, group_by_circle};
pub use types::{CallerRole, CircleGroup, ADMIN_LABEL, UNASSIGNED_CIRCLE};
