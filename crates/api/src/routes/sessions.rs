//! Route definitions for generation sessions.
//!
//! All routes are mounted under `/sessions`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Generation session routes mounted at `/sessions`.
///
/// ```text
/// POST /                              -> create_session
/// GET  /{id}                          -> get_session
/// PUT  /{id}/answers/{question_id}    -> set_answer
/// POST /{id}/generate                 -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::create_session))
        .route("/{id}", get(sessions::get_session))
        .route("/{id}/answers/{question_id}", put(sessions::set_answer))
        .route("/{id}/generate", post(sessions::generate))
}
