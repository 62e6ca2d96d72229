//! Handlers for generation sessions.
//!
//! A session is created against a visible template, collects answers, and
//! is driven to a terminal state by the generate endpoint, which issues
//! all asset requests to the generation capability concurrently and
//! records results as they arrive.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Deserialize;

use brandkit_core::answers::AnswerValue;
use brandkit_core::error::CoreError;
use brandkit_core::request::build_requests;
use brandkit_core::session::GenerationSession;
use brandkit_core::template::{ContentTemplate, TemplateOrigin};
use brandkit_core::types::EntityId;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub template_id: EntityId,
    pub selected_style: String,
    #[serde(default)]
    pub color_palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetAnswerRequest {
    pub value: AnswerValue,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch the template backing a session, enforcing template visibility.
async fn session_template(
    state: &AppState,
    template_id: EntityId,
    auth: &AuthUser,
) -> AppResult<ContentTemplate> {
    let registry = state.templates.read().await;
    let template = registry
        .get(template_id)
        .filter(|t| match t.origin {
            TemplateOrigin::BuiltIn => true,
            TemplateOrigin::Custom => t.owner_id == Some(auth.user_id),
        })
        .ok_or(CoreError::NotFound {
            entity: "ContentTemplate",
            id: template_id,
        })?;
    Ok(template.clone())
}

// ---------------------------------------------------------------------------
// Session CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions
///
/// Start an `in-progress` session for a template flow.
pub async fn create_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<impl IntoResponse> {
    let template = session_template(&state, input.template_id, &auth).await?;

    let session = GenerationSession::new(
        template.id,
        auth.user_id,
        input.selected_style,
        input.color_palette,
    );
    let snapshot = session.clone();
    state.sessions.insert(session).await;

    tracing::info!(
        session_id = %snapshot.id,
        template_id = %template.id,
        user_id = %auth.user_id,
        "Generation session created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: snapshot })))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.snapshot(id, auth.user_id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/sessions/{id}/answers/{question_id}
///
/// Record one answer. The value shape must match the question's kind.
pub async fn set_answer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, question_id)): Path<(EntityId, String)>,
    Json(input): Json<SetAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.snapshot(id, auth.user_id).await?;
    let template = session_template(&state, session.template_id, &auth).await?;

    let updated = state
        .sessions
        .with_session(id, auth.user_id, |s| {
            s.set_answer(&template, &question_id, input.value)?;
            Ok(s.clone())
        })
        .await?;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/{id}/generate
///
/// Finalize answers, build the typed generation requests, issue them all
/// concurrently, and drive the session to a terminal state: `completed`
/// once every asset has been recorded, `failed` if any capability call
/// fails. Results are recorded in arrival order.
pub async fn generate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.snapshot(id, auth.user_id).await?;
    let template = session_template(&state, session.template_id, &auth).await?;

    // Recoverable validation failures leave the session untouched so the
    // user can fill in the missing answers and retry.
    session.finalize_answers(&template)?;

    let requests = build_requests(
        &template,
        &session.answers,
        &session.selected_style,
        &session.color_palette,
    )?;

    tracing::info!(
        session_id = %id,
        request_count = requests.len(),
        "Dispatching generation requests",
    );

    let mut pending: FuturesUnordered<_> = requests
        .iter()
        .map(|request| state.generator.generate(request))
        .collect();

    let mut failure: Option<CoreError> = None;
    while let Some(result) = pending.next().await {
        match result {
            Ok(asset) => {
                state
                    .sessions
                    .with_session(id, auth.user_id, |s| s.record_generated_asset(asset))
                    .await?;
            }
            Err(err) if failure.is_none() => failure = Some(err),
            Err(_) => {}
        }
    }

    if let Some(err) = failure {
        let reason = err.to_string();
        state
            .sessions
            .with_session(id, auth.user_id, |s| s.fail(reason.clone()))
            .await?;

        tracing::warn!(session_id = %id, error = %reason, "Generation session failed");
        return Err(AppError::GenerationFailed(reason));
    }

    let completed = state
        .sessions
        .with_session(id, auth.user_id, |s| {
            s.complete()?;
            Ok(s.clone())
        })
        .await?;

    tracing::info!(
        session_id = %id,
        asset_count = completed.generated_assets.len(),
        "Generation session completed",
    );

    Ok(Json(DataResponse { data: completed }))
}
