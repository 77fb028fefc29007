use std::sync::Arc;

use schoolhub_core::intake::InFlightRegistry;
use schoolhub_core::store::{ObjectStore, RecordStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Durable storage for school records.
    pub records: Arc<dyn RecordStore>,
    /// Blob storage for school images.
    pub objects: Arc<dyn ObjectStore>,
    /// Form instances with a submission currently in flight.
    pub in_flight: Arc<InFlightRegistry>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        records: Arc<dyn RecordStore>,
        objects: Arc<dyn ObjectStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            records,
            objects,
            in_flight: InFlightRegistry::new(),
            config: Arc::new(config),
        }
    }
}
