use std::sync::Arc;

use tokio::sync::RwLock;

use brandkit_core::capability::{GenerationCapability, UploadCapability};
use brandkit_core::store::SessionStore;
use brandkit_core::template::TemplateRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (upload ceilings, CORS, timeouts).
    pub config: Arc<ServerConfig>,
    /// Built-in and user-defined content templates.
    pub templates: Arc<RwLock<TemplateRegistry>>,
    /// In-memory generation sessions with per-session locking.
    pub sessions: Arc<SessionStore>,
    /// External upload provider.
    pub uploader: Arc<dyn UploadCapability>,
    /// External asset-generation provider.
    pub generator: Arc<dyn GenerationCapability>,
}
