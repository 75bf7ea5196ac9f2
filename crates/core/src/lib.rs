//! Pure core of the checkpost store.
//!
//! Nothing in this crate performs I/O except through the
//! [`storage::DocumentRepository`] trait, which callers implement.

pub mod access;
pub mod calendar;
pub mod checkpost;
pub mod serde;
pub mod storage;
