#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use schoolhub_api::config::{LogFormat, ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use schoolhub_api::router::build_app_router;
use schoolhub_api::state::AppState;
use schoolhub_cloud::StorageConfig;
use schoolhub_core::error::StoreError;
use schoolhub_core::school::{NewSchool, School};
use schoolhub_core::store::{ObjectStore, RecordStore, UploadOptions};
use tokio::sync::Notify;
use tower::ServiceExt;

pub const BOUNDARY: &str = "schoolhub-test-boundary";

// ---------------------------------------------------------------------------
// Fake stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryRecords {
    pub rows: Mutex<Vec<School>>,
    pub fail_insert: bool,
    pub fail_list: bool,
    pub inserts: AtomicUsize,
    /// When set, `insert` signals `started` and then waits for `release`.
    pub gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MemoryRecords {
    pub fn with_rows(rows: Vec<School>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryRecords {
    async fn insert(&self, school: &NewSchool) -> Result<School, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }
        if self.fail_insert {
            return Err(StoreError::Rejected("permission denied".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let saved = school.clone().into_school(id, chrono::Utc::now());
        rows.insert(0, saved.clone());
        Ok(saved)
    }

    async fn list_newest_first(&self) -> Result<Vec<School>, StoreError> {
        if self.fail_list {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryObjects {
    pub uploads: Mutex<Vec<(String, UploadOptions)>>,
    pub fail: bool,
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn upload(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("network down".into()));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((key.to_string(), options.clone()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://storage.test/storage/v1/object/public/school-images/{key}")
    }
}

pub fn school(id: i64, name: &str, city: &str, state: &str) -> School {
    School {
        id,
        name: name.into(),
        address: format!("{id} Main Street"),
        city: city.into(),
        state: state.into(),
        contact: "9876543210".into(),
        email_id: "office@example.edu".into(),
        image_url: None,
        created_at: chrono::Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:3000")],
        request_timeout_secs: 30,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        database_url: "postgres://unused".to_string(),
        storage: StorageConfig::new("https://storage.test", "test-key"),
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router over the given fakes, with the same
/// middleware stack production uses.
pub fn build_test_app(records: Arc<MemoryRecords>, objects: Arc<MemoryObjects>) -> Router {
    build_test_app_with_config(records, objects, test_config())
}

pub fn build_test_app_with_config(
    records: Arc<MemoryRecords>,
    objects: Arc<MemoryObjects>,
    config: ServerConfig,
) -> Router {
    let state = AppState::new(records, objects, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A file part for [`multipart_request`].
pub struct FilePart<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Build a `multipart/form-data` POST with the given text fields and an
/// optional `image` file part.
pub fn multipart_request(uri: &str, fields: &[(&str, &str)], image: Option<FilePart<'_>>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    image: Option<FilePart<'_>>,
) -> Response<Body> {
    app.oneshot(multipart_request(uri, fields, image))
        .await
        .unwrap()
}

/// Text fields of a form that passes validation.
pub fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Oak Hill Academy"),
        ("address", "12 Ridge Road"),
        ("city", "Pune"),
        ("state", "Maharashtra"),
        ("contact", "9876543210"),
        ("email_id", "office@oakhill.edu"),
    ]
}
