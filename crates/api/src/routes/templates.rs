//! Route definitions for the content template registry.
//!
//! All routes are mounted under `/templates`.

use axum::routing::get;
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template registry routes mounted at `/templates`.
///
/// ```text
/// GET  /      -> list_templates
/// POST /      -> create_template
/// GET  /{id}  -> get_template
/// PUT  /{id}  -> update_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/{id}",
            get(templates::get_template).put(templates::update_template),
        )
}
