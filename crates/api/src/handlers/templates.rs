//! Handlers for the content template registry.
//!
//! Built-in templates are visible to everyone; custom templates are
//! visible (and editable) only by their owner.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use brandkit_core::error::CoreError;
use brandkit_core::template::{ContentTemplate, TemplateDraft, TemplateOrigin};
use brandkit_core::types::EntityId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Whether `template` is visible to `auth`.
///
/// Custom templates owned by someone else are reported as not found
/// rather than forbidden, so template ids do not leak across users.
fn visible_to(template: &ContentTemplate, auth: &AuthUser) -> bool {
    match template.origin {
        TemplateOrigin::BuiltIn => true,
        TemplateOrigin::Custom => template.owner_id == Some(auth.user_id),
    }
}

/// GET /api/v1/templates
///
/// List templates visible to the caller: built-ins plus their own active
/// custom templates.
pub async fn list_templates(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let registry = state.templates.read().await;
    let templates: Vec<ContentTemplate> = registry
        .list_for_user(auth.user_id)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/templates/{id}
pub async fn get_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let registry = state.templates.read().await;
    let template = registry
        .get(id)
        .filter(|t| visible_to(t, &auth))
        .ok_or(CoreError::NotFound {
            entity: "ContentTemplate",
            id,
        })?
        .clone();

    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/templates
///
/// Create a custom template owned by the caller.
pub async fn create_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<TemplateDraft>,
) -> AppResult<impl IntoResponse> {
    let mut registry = state.templates.write().await;
    let template = registry.create_custom(draft, auth.user_id)?.clone();

    tracing::info!(
        template_id = %template.id,
        user_id = %auth.user_id,
        name = %template.name,
        "Custom template created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// PUT /api/v1/templates/{id}
///
/// Replace the contents of a custom template owned by the caller.
pub async fn update_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(draft): Json<TemplateDraft>,
) -> AppResult<impl IntoResponse> {
    let mut registry = state.templates.write().await;
    let template = registry.update_custom(id, draft, auth.user_id)?.clone();

    tracing::info!(template_id = %id, user_id = %auth.user_id, "Custom template updated");

    Ok(Json(DataResponse { data: template }))
}
