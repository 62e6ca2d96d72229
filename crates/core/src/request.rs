//! Generation request building: prompt resolution and typed requests.
//!
//! Turns a (template, answers, style, palette) tuple into one immutable
//! [`AssetGenerationRequest`] per asset kind the template is configured to
//! produce. This module is side-effect free; it never talks to the
//! generation capability itself.

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerValue, TemplateAnswers};
use crate::error::CoreError;
use crate::template::{extract_placeholders, ContentTemplate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Separator used when a multiselect answer is substituted into a prompt.
pub const MULTISELECT_SEPARATOR: &str = ", ";

// ---------------------------------------------------------------------------
// Asset kinds
// ---------------------------------------------------------------------------

/// The kinds of assets a template submission can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    #[serde(rename = "background")]
    Background,
    #[serde(rename = "logo")]
    Logo,
    #[serde(rename = "text-overlay")]
    TextOverlay,
    #[serde(rename = "decorative")]
    Decorative,
}

impl AssetKind {
    /// Wire-format name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Logo => "logo",
            Self::TextOverlay => "text-overlay",
            Self::Decorative => "decorative",
        }
    }
}

// ---------------------------------------------------------------------------
// Request type
// ---------------------------------------------------------------------------

/// A single typed asset-generation request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGenerationRequest {
    pub kind: AssetKind,
    /// The fully resolved prompt (no placeholders remain).
    pub prompt: String,
    pub style: String,
    /// Ordered color strings, most dominant first.
    pub color_palette: Vec<String>,
    pub industry: String,
}

// ---------------------------------------------------------------------------
// Prompt resolution
// ---------------------------------------------------------------------------

/// Substitute every `{questionId}` placeholder in the template's prompt
/// with its collected answer. Multiselect answers are joined with
/// [`MULTISELECT_SEPARATOR`].
///
/// A placeholder without an answer yields
/// [`CoreError::UnresolvedPlaceholder`]. After a successful
/// `finalize_answers` this can only happen for *optional* questions left
/// unanswered while still being referenced by the prompt, or a registry
/// inconsistency; either way the caller must treat it as an
/// internal-consistency fault, log it, and not retry.
pub fn resolve_prompt(
    template: &ContentTemplate,
    answers: &TemplateAnswers,
) -> Result<String, CoreError> {
    let mut prompt = template.prompt_template.clone();

    for placeholder in extract_placeholders(&template.prompt_template) {
        let value = answers
            .get(&placeholder)
            .ok_or_else(|| CoreError::UnresolvedPlaceholder {
                placeholder: placeholder.clone(),
            })?;

        let text = match value {
            AnswerValue::Single(s) => s.clone(),
            AnswerValue::Many(values) => values.join(MULTISELECT_SEPARATOR),
        };

        prompt = prompt.replace(&format!("{{{placeholder}}}"), &text);
    }

    Ok(prompt)
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

/// Build one [`AssetGenerationRequest`] per asset kind the template
/// requests, all sharing the same resolved prompt, style, and palette.
pub fn build_requests(
    template: &ContentTemplate,
    answers: &TemplateAnswers,
    style: &str,
    palette: &[String],
) -> Result<Vec<AssetGenerationRequest>, CoreError> {
    let prompt = resolve_prompt(template, answers)?;

    // Registry validation guarantees a non-empty list; fall back to a
    // single background request if an unvalidated template slips through.
    let kinds: &[AssetKind] = if template.requested_types.is_empty() {
        &[AssetKind::Background]
    } else {
        &template.requested_types
    };

    Ok(kinds
        .iter()
        .map(|&kind| AssetGenerationRequest {
            kind,
            prompt: prompt.clone(),
            style: style.to_string(),
            color_palette: palette.to_vec(),
            industry: template.industry.clone(),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
