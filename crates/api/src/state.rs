use std::sync::Arc;

use describer_db::RecordStore;
use describer_storage::StorageBackend;

use crate::config::ServerConfig;
use crate::sessions::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Knowledge base (records, question catalog, metadata).
    pub store: Arc<dyn RecordStore>,
    /// Profile image source.
    pub storage: Arc<dyn StorageBackend>,
    /// Labeling sessions in progress.
    pub sessions: Arc<SessionRegistry>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
