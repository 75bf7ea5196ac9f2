//! In-memory storage backend for testing.
//!
//! Documents live in a `HashMap` of collections wrapped in `Arc<RwLock<_>>`.
//! Filters are evaluated with [`Filters::apply`](checkpost_core::storage::Filters::apply),
//! so queries behave like the remote backend's for the supported operators.
//!
//! # Example
//!
//! ```rust
//! use checkpost::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! // Use repo for testing...
//! # let _ = repo;
//! ```

mod repository;

pub use repository::InMemoryRepository;
