//! The generation session state machine.
//!
//! A session is created `in-progress` when a user starts a template flow,
//! collects answers and generated assets, and ends in exactly one of the
//! terminal states `completed` or `failed`. Terminal sessions are immutable
//! except for read access; every attempted mutation is rejected without
//! side effects.

use serde::{Deserialize, Serialize};

use crate::answers::{self, AnswerValue, TemplateAnswers};
use crate::error::CoreError;
use crate::request::AssetKind;
use crate::template::ContentTemplate;
use crate::types::{EntityId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

// ---------------------------------------------------------------------------
// Generated assets
// ---------------------------------------------------------------------------

/// Pixel dimensions and format of a generated or uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// An asset produced by the generation capability, owned exclusively by
/// the session that generated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAsset {
    pub id: EntityId,
    /// Matches the kind of the request that produced it.
    pub kind: AssetKind,
    pub url: String,
    pub prompt: String,
    pub style: String,
    pub created_at: Timestamp,
    pub metadata: AssetMetadata,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A template-driven generation session.
///
/// All mutating methods bump `updated_at`; `created_at` is set once at
/// construction. Mutations on a terminal session fail with
/// [`CoreError::SessionClosed`] and leave the session untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSession {
    pub id: EntityId,
    pub template_id: EntityId,
    pub user_id: UserId,
    pub answers: TemplateAnswers,
    pub selected_style: String,
    pub color_palette: Vec<String>,
    /// Append-only; ordered by arrival, not by request order.
    pub generated_assets: Vec<GeneratedAsset>,
    pub status: SessionStatus,
    /// Diagnostic reason, present only after `fail`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GenerationSession {
    /// Start a new `in-progress` session for a template flow.
    pub fn new(
        template_id: EntityId,
        user_id: UserId,
        selected_style: String,
        color_palette: Vec<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: EntityId::new_v4(),
            template_id,
            user_id,
            answers: TemplateAnswers::new(),
            selected_style,
            color_palette,
            generated_assets: Vec::new(),
            status: SessionStatus::InProgress,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.status.is_terminal() {
            return Err(CoreError::SessionClosed {
                session_id: self.id,
                status: self.status.as_str(),
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }

    /// Record an answer for one of the template's questions.
    ///
    /// The question must exist in `template` (the session's template) and
    /// the value must satisfy the question's shape and constraints.
    pub fn set_answer(
        &mut self,
        template: &ContentTemplate,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<(), CoreError> {
        self.ensure_open()?;

        let question = template.question(question_id).ok_or_else(|| {
            CoreError::AnswerValidation(format!(
                "Question '{question_id}' does not exist in template '{}'",
                template.name
            ))
        })?;
        answers::validate_answer(question, &value)?;

        self.answers.insert(question_id.to_string(), value);
        self.touch();
        Ok(())
    }

    /// Check that every required question has been answered. Read-only.
    pub fn finalize_answers(&self, template: &ContentTemplate) -> Result<(), CoreError> {
        answers::finalize_answers(template, &self.answers)
    }

    /// Append an asset delivered by the generation capability.
    ///
    /// Assets may arrive in any order; `generated_assets` reflects arrival
    /// order. Valid only while `in-progress`.
    pub fn record_generated_asset(&mut self, asset: GeneratedAsset) -> Result<(), CoreError> {
        self.ensure_open()?;

        if asset.metadata.width == 0 || asset.metadata.height == 0 {
            return Err(CoreError::Validation(format!(
                "Generated asset {} has zero-sized dimensions",
                asset.id
            )));
        }

        self.generated_assets.push(asset);
        self.touch();
        Ok(())
    }

    /// Transition `in-progress` -> `completed`.
    ///
    /// Requires at least one recorded asset.
    pub fn complete(&mut self) -> Result<(), CoreError> {
        self.ensure_open()?;

        if self.generated_assets.is_empty() {
            return Err(CoreError::EmptySession {
                session_id: self.id,
            });
        }

        self.status = SessionStatus::Completed;
        self.touch();
        Ok(())
    }

    /// Transition `in-progress` -> `failed`, retaining a diagnostic reason.
    ///
    /// Not idempotent: a second call fails with [`CoreError::SessionClosed`].
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_open()?;

        self.status = SessionStatus::Failed;
        self.failure_reason = Some(reason.into());
        self.touch();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
