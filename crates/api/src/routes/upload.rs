//! Route definition for the asset library upload endpoint.
//!
//! Kept at its documented path `/api/asset-library/upload` (outside the
//! `/api/v1` tree) for compatibility with existing clients.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::upload;
use crate::state::AppState;

/// Request-body headroom for multipart framing and the text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Upload route mounted at root level.
///
/// Axum caps request bodies at 2 MiB out of the box, well under the
/// configured upload ceilings, so the limit is raised here to admit the
/// largest allowed file plus multipart framing. The exact per-category
/// size check stays in the handler.
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route("/api/asset-library/upload", post(upload::upload_asset))
        .layer(DefaultBodyLimit::max(
            config.max_file_upload_bytes as usize + MULTIPART_OVERHEAD_BYTES,
        ))
}
