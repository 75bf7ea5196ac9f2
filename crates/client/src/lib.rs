//! checkpost_client - HTTP document backend for the checkpost store.
//!
//! [`AppwriteClient`] talks to an Appwrite-style documents REST API and
//! implements [`DocumentRepository`](checkpost_core::storage::DocumentRepository),
//! so it can back a `CheckpostListStore` or `CheckpostService` directly.

pub mod client;
pub mod config;
pub mod error;
pub mod queries;

pub use client::AppwriteClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
