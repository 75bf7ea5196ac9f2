//! Storage backend implementations.
//!
//! This module provides concrete implementations of the
//! [`DocumentRepository`](checkpost_core::storage::DocumentRepository) trait
//! defined in `checkpost_core::storage`. The hosted backend lives in the
//! `checkpost_client` crate; the in-memory backend here serves tests and
//! local runs.

pub mod inmemory;

#[cfg(test)]
pub(crate) mod testing;

pub use inmemory::InMemoryRepository;
