use async_trait::async_trait;
use schoolhub_core::error::StoreError;
use schoolhub_core::store::{ObjectStore, UploadOptions};

/// Default bucket for school images.
pub const DEFAULT_BUCKET: &str = "school-images";

/// Default `cache-control` max-age for uploaded objects, in seconds.
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 3600;

/// Connection settings for the storage service.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Project base URL, e.g. `https://abc.example.co`. No trailing slash.
    pub base_url: String,
    /// Service key sent as both bearer token and `apikey` header.
    pub service_key: String,
    pub bucket: String,
    pub cache_max_age_secs: u64,
}

impl StorageConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_cache_max_age(mut self, secs: u64) -> Self {
        self.cache_max_age_secs = secs;
        self
    }
}

/// Errors from the storage REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage service returned a non-2xx status code.
    #[error("Storage API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Request(e) => StoreError::Unavailable(e.to_string()),
            StorageError::Api { status, body } => {
                StoreError::Rejected(format!("status {status}: {body}"))
            }
        }
    }
}

/// HTTP client for one storage bucket.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    config: StorageConfig,
}

impl StorageClient {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Upload `bytes` to `key` in the configured bucket.
    ///
    /// Sends `POST /storage/v1/object/{bucket}/{key}`. With `overwrite`
    /// disabled the service rejects the upload if the key already exists.
    pub async fn upload_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, self.config.bucket, key
        );

        let content_type = options
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .header("x-upsert", if options.overwrite { "true" } else { "false" })
            .header(
                "cache-control",
                format!("max-age={}", self.config.cache_max_age_secs),
            )
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Public URL for `key` in the configured bucket.
    pub fn object_public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, self.config.bucket, key
        )
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, otherwise capture
    /// the status and body text in a [`StorageError::Api`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StoreError> {
        self.upload_object(key, bytes, options)
            .await
            .map_err(StoreError::from)
    }

    fn public_url(&self, key: &str) -> String {
        self.object_public_url(key)
    }
}
