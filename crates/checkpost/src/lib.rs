//! Access-scoped checkpost store.
//!
//! [`CheckpostListStore`] caches the checkposts a caller may see and
//! aggregates their daily-log counters over a day, month or year in the
//! reference time zone. [`CheckpostService`] is the typed write path for
//! checkposts, daily logs, cases and the seized-item catalog.
//!
//! Both sit on top of a [`DocumentRepository`](checkpost_core::storage::DocumentRepository);
//! see [`storage`] for the bundled backends.

pub mod config;
pub mod error;
pub mod service;
pub mod storage;
pub mod store;

pub use config::{Collections, Config};
pub use error::{ConfigError, ServiceError};
pub use service::CheckpostService;
pub use store::{CheckpostListStore, LoadState, StoreSnapshot};
