//! Answer values and the answer-collection rules.
//!
//! Answers arrive from the UI as either a single string or a list of
//! strings keyed by question id. The shape is validated here at the
//! boundary, against the question's declared kind, so nothing downstream
//! needs to re-check it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::template::{ContentTemplate, TemplateQuestion};

// ---------------------------------------------------------------------------
// Answer value
// ---------------------------------------------------------------------------

/// A validated answer: a single string for text/textarea/select questions,
/// a list of strings for multiselect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Many(Vec<String>),
}

impl AnswerValue {
    /// An answer counts as empty if it carries no usable text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(s) => s.trim().is_empty(),
            Self::Many(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Answer collection
// ---------------------------------------------------------------------------

/// Per-session mapping from question id to its collected answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateAnswers(BTreeMap<String, AnswerValue>);

impl TemplateAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn insert(&mut self, question_id: String, value: AnswerValue) {
        self.0.insert(question_id, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a submitted answer against its question.
///
/// Rules:
/// - Shape must match the kind: a list iff the question is multiselect.
/// - Select/multiselect values must come from the question's option list.
/// - `max_length` is enforced for free-text questions.
/// - A required question cannot be set to an empty answer.
pub fn validate_answer(question: &TemplateQuestion, value: &AnswerValue) -> Result<(), CoreError> {
    let is_multiselect = matches!(question.kind, crate::template::QuestionKind::Multiselect);
    match value {
        AnswerValue::Many(_) if !is_multiselect => {
            return Err(CoreError::AnswerValidation(format!(
                "Question '{}' expects a single value, got a list",
                question.id
            )));
        }
        AnswerValue::Single(_) if is_multiselect => {
            return Err(CoreError::AnswerValidation(format!(
                "Question '{}' expects a list of values, got a single value",
                question.id
            )));
        }
        _ => {}
    }

    if question.kind.is_option_based() {
        let check_option = |v: &str| -> Result<(), CoreError> {
            if question.options.iter().any(|o| o == v) {
                Ok(())
            } else {
                Err(CoreError::AnswerValidation(format!(
                    "'{v}' is not an option of question '{}'",
                    question.id
                )))
            }
        };
        match value {
            AnswerValue::Single(v) => check_option(v)?,
            AnswerValue::Many(values) => {
                for v in values {
                    check_option(v)?;
                }
            }
        }
    }

    if let (Some(max_length), AnswerValue::Single(v)) = (question.max_length, value) {
        if question.kind.is_free_text() && v.chars().count() > max_length {
            return Err(CoreError::AnswerValidation(format!(
                "Answer to '{}' exceeds maximum length of {max_length} characters",
                question.id
            )));
        }
    }

    if question.required && value.is_empty() {
        return Err(CoreError::AnswerValidation(format!(
            "Question '{}' is required and cannot be set to an empty answer",
            question.id
        )));
    }

    Ok(())
}

/// Check that every required question has a non-empty answer.
///
/// Called before generation; performs no mutation.
pub fn finalize_answers(
    template: &ContentTemplate,
    answers: &TemplateAnswers,
) -> Result<(), CoreError> {
    for question in &template.questions {
        if !question.required {
            continue;
        }
        match answers.get(&question.id) {
            Some(value) if !value.is_empty() => {}
            _ => {
                return Err(CoreError::MissingRequiredAnswer {
                    question_id: question.id.clone(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
