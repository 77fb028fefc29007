//! Collaborator traits for the hosted record store and object store.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::school::{NewSchool, School};

/// Durable structured storage for school records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one validated record. The store assigns `id` and `created_at`.
    async fn insert(&self, school: &NewSchool) -> Result<School, StoreError>;

    /// All records ordered by `created_at`, newest first.
    async fn list_newest_first(&self) -> Result<Vec<School>, StoreError>;

    /// Cheap reachability check used by the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Options for a single object upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Replace an existing object with the same key.
    pub overwrite: bool,
    pub content_type: Option<String>,
}

/// Blob storage that resolves objects to public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StoreError>;

    /// Public URL of `key`. Does not check that the object exists.
    fn public_url(&self, key: &str) -> String;
}
