//! REST client for the hosted object storage service.
//!
//! Wraps the storage HTTP API (object upload, public URL resolution) using
//! [`reqwest`] and exposes it as a [`schoolhub_core::store::ObjectStore`].

pub mod storage;

pub use storage::{StorageClient, StorageConfig, StorageError};
