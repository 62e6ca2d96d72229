use crate::types::EntityId;

/// Domain-level error type shared by every core component.
///
/// The validation family (`TemplateInvalid`, `AnswerValidation`,
/// `MissingRequiredAnswer`, `Validation`) and the state family
/// (`SessionClosed`, `EmptySession`) are recoverable by the caller:
/// the offending step can be retried without losing session state.
/// `UnresolvedPlaceholder` indicates a registry/builder mismatch and
/// must be logged and treated as fatal to the current request.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Invalid template: {0}")]
    TemplateInvalid(String),

    #[error("Answer validation failed: {0}")]
    AnswerValidation(String),

    #[error("Missing required answer for question '{question_id}'")]
    MissingRequiredAnswer { question_id: String },

    #[error("Unresolved placeholder '{{{placeholder}}}' in prompt template")]
    UnresolvedPlaceholder { placeholder: String },

    #[error("Session {session_id} is {status} and no longer accepts mutations")]
    SessionClosed {
        session_id: EntityId,
        status: &'static str,
    },

    #[error("Session {session_id} has no generated assets and cannot be completed")]
    EmptySession { session_id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
