pub mod health;
pub mod sessions;
pub mod templates;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates                          list, create
/// /templates/{id}                     get, update
///
/// /sessions                           create
/// /sessions/{id}                      get
/// /sessions/{id}/answers/{question}   set answer (PUT)
/// /sessions/{id}/generate             run generation (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/sessions", sessions::router())
}
