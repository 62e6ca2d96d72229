//! Content template model, validation, and the template registry.
//!
//! A [`ContentTemplate`] carries an ordered questionnaire plus a prompt
//! template whose `{questionId}` placeholders are resolved against the
//! collected answers at generation time. Built-in templates are seeded at
//! process start and are immutable; users may create and edit their own
//! custom templates.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::request::AssetKind;
use crate::types::{EntityId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for a template name.
pub const MAX_TEMPLATE_NAME_LEN: usize = 200;

/// Regex pattern matching `{questionId}` tokens in prompt templates.
pub const PLACEHOLDER_PATTERN: &str = r"\{[a-zA-Z_][a-zA-Z0-9_]*\}";

/// Compiled regex for `{questionId}` extraction. Compiled once, reused forever.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Question model
// ---------------------------------------------------------------------------

/// Input widget kind for a template question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Select,
    Textarea,
    Multiselect,
}

impl QuestionKind {
    /// Whether answers for this kind must come from a fixed option list.
    pub fn is_option_based(self) -> bool {
        matches!(self, Self::Select | Self::Multiselect)
    }

    /// Whether this kind accepts free text (and therefore a `max_length`).
    pub fn is_free_text(self) -> bool {
        matches!(self, Self::Text | Self::Textarea)
    }
}

/// A single question in a template's questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuestion {
    /// Unique within the owning template.
    pub id: String,
    /// The question text shown to the user.
    pub prompt: String,
    pub kind: QuestionKind,
    /// Non-empty iff `kind` is select or multiselect.
    #[serde(default)]
    pub options: Vec<String>,
    pub required: bool,
    /// UI hint text; no semantic meaning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Character limit; only meaningful for text/textarea.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

// ---------------------------------------------------------------------------
// Template model
// ---------------------------------------------------------------------------

/// Whether a template was seeded by the platform or created by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateOrigin {
    #[serde(rename = "built-in")]
    BuiltIn,
    #[serde(rename = "custom")]
    Custom,
}

/// A content template: questionnaire + prompt template + asset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTemplate {
    pub id: EntityId,
    pub name: String,
    pub origin: TemplateOrigin,
    pub industry: String,
    pub description: String,
    /// Ordered questionnaire; question ids are unique within the template.
    pub questions: Vec<TemplateQuestion>,
    /// Prompt text with `{questionId}` placeholders.
    pub prompt_template: String,
    /// Asset kinds produced per submission. Defaults to a single background.
    pub requested_types: Vec<AssetKind>,
    pub is_active: bool,
    pub created_at: Timestamp,
    /// Absent for built-in templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
}

impl ContentTemplate {
    /// Look up a question by id.
    pub fn question(&self, question_id: &str) -> Option<&TemplateQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// Payload for creating or replacing a custom template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<TemplateQuestion>,
    pub prompt_template: String,
    #[serde(default = "default_requested_types")]
    pub requested_types: Vec<AssetKind>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_requested_types() -> Vec<AssetKind> {
    vec![AssetKind::Background]
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Placeholder extraction
// ---------------------------------------------------------------------------

/// Extract all `{questionId}` tokens from a prompt template.
///
/// Returns a de-duplicated, sorted list of placeholder names (without braces).
pub fn extract_placeholders(prompt_template: &str) -> Vec<String> {
    let mut placeholders: Vec<String> = PLACEHOLDER_RE
        .find_iter(prompt_template)
        .map(|m| {
            let s = m.as_str();
            s[1..s.len() - 1].to_string()
        })
        .collect();
    placeholders.sort();
    placeholders.dedup();
    placeholders
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a template's internal consistency.
///
/// Rules:
/// - Name must be non-empty and within length limit.
/// - Question ids must be unique within the template.
/// - `options` must be non-empty iff the question kind is option-based.
/// - `max_length` is only allowed on free-text questions.
/// - Every `{questionId}` placeholder in the prompt template must reference
///   a declared question id.
/// - `requested_types` must be non-empty.
pub fn validate_template(
    name: &str,
    questions: &[TemplateQuestion],
    prompt_template: &str,
    requested_types: &[AssetKind],
) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::TemplateInvalid(
            "Template name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_TEMPLATE_NAME_LEN {
        return Err(CoreError::TemplateInvalid(format!(
            "Template name too long: {} chars (max {MAX_TEMPLATE_NAME_LEN})",
            name.len()
        )));
    }

    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        if question.id.is_empty() {
            return Err(CoreError::TemplateInvalid(
                "Question id must not be empty".to_string(),
            ));
        }
        if !seen.insert(question.id.as_str()) {
            return Err(CoreError::TemplateInvalid(format!(
                "Duplicate question id '{}'",
                question.id
            )));
        }
        if question.kind.is_option_based() && question.options.is_empty() {
            return Err(CoreError::TemplateInvalid(format!(
                "Question '{}' is option-based but declares no options",
                question.id
            )));
        }
        if !question.kind.is_option_based() && !question.options.is_empty() {
            return Err(CoreError::TemplateInvalid(format!(
                "Question '{}' is free-text and must not declare options",
                question.id
            )));
        }
        if question.max_length.is_some() && !question.kind.is_free_text() {
            return Err(CoreError::TemplateInvalid(format!(
                "Question '{}' declares max_length but is not free-text",
                question.id
            )));
        }
    }

    for placeholder in extract_placeholders(prompt_template) {
        if !seen.contains(placeholder.as_str()) {
            return Err(CoreError::TemplateInvalid(format!(
                "Prompt placeholder '{{{placeholder}}}' does not reference a declared question id"
            )));
        }
    }

    if requested_types.is_empty() {
        return Err(CoreError::TemplateInvalid(
            "Template must request at least one asset type".to_string(),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// In-memory registry of built-in and custom templates.
///
/// Built-ins are seeded once via [`TemplateRegistry::with_builtins`] and are
/// immutable afterwards; custom templates are scoped to their owning user.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<EntityId, ContentTemplate>,
}

impl TemplateRegistry {
    /// An empty registry (useful for tests).
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the platform's built-in templates.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for template in builtin_templates() {
            registry.templates.insert(template.id, template);
        }
        registry
    }

    /// Look up a template by id, regardless of visibility.
    pub fn get(&self, id: EntityId) -> Option<&ContentTemplate> {
        self.templates.get(&id)
    }

    /// Templates visible to `user_id`: all built-ins plus that user's
    /// custom templates where `is_active`.
    ///
    /// Ordered built-ins first, then by name, for deterministic listings.
    pub fn list_for_user(&self, user_id: UserId) -> Vec<&ContentTemplate> {
        let mut visible: Vec<&ContentTemplate> = self
            .templates
            .values()
            .filter(|t| match t.origin {
                TemplateOrigin::BuiltIn => true,
                TemplateOrigin::Custom => t.owner_id == Some(user_id) && t.is_active,
            })
            .collect();
        visible.sort_by(|a, b| {
            (a.origin == TemplateOrigin::Custom, &a.name).cmp(&(b.origin == TemplateOrigin::Custom, &b.name))
        });
        visible
    }

    /// Create a custom template owned by `owner_id`.
    pub fn create_custom(
        &mut self,
        draft: TemplateDraft,
        owner_id: UserId,
    ) -> Result<&ContentTemplate, CoreError> {
        validate_template(
            &draft.name,
            &draft.questions,
            &draft.prompt_template,
            &draft.requested_types,
        )?;

        let id = EntityId::new_v4();
        let template = ContentTemplate {
            id,
            name: draft.name,
            origin: TemplateOrigin::Custom,
            industry: draft.industry,
            description: draft.description,
            questions: draft.questions,
            prompt_template: draft.prompt_template,
            requested_types: draft.requested_types,
            is_active: draft.is_active,
            created_at: chrono::Utc::now(),
            owner_id: Some(owner_id),
        };
        Ok(self.templates.entry(id).or_insert(template))
    }

    /// Replace the contents of a custom template owned by `owner_id`.
    ///
    /// Built-in templates are immutable; editing one (or another user's
    /// template) is forbidden. The id, origin, owner, and creation time
    /// are preserved.
    pub fn update_custom(
        &mut self,
        id: EntityId,
        draft: TemplateDraft,
        owner_id: UserId,
    ) -> Result<&ContentTemplate, CoreError> {
        validate_template(
            &draft.name,
            &draft.questions,
            &draft.prompt_template,
            &draft.requested_types,
        )?;

        let template = self.templates.get_mut(&id).ok_or(CoreError::NotFound {
            entity: "ContentTemplate",
            id,
        })?;

        if template.origin == TemplateOrigin::BuiltIn {
            return Err(CoreError::Forbidden(
                "Built-in templates cannot be edited".to_string(),
            ));
        }
        if template.owner_id != Some(owner_id) {
            return Err(CoreError::Forbidden(
                "Template is owned by another user".to_string(),
            ));
        }

        template.name = draft.name;
        template.industry = draft.industry;
        template.description = draft.description;
        template.questions = draft.questions;
        template.prompt_template = draft.prompt_template;
        template.requested_types = draft.requested_types;
        template.is_active = draft.is_active;
        Ok(template)
    }
}

// ---------------------------------------------------------------------------
// Built-in seed data
// ---------------------------------------------------------------------------

/// The built-in templates seeded at process start.
fn builtin_templates() -> Vec<ContentTemplate> {
    let now = chrono::Utc::now();

    let builtin = |name: &str,
                   industry: &str,
                   description: &str,
                   questions: Vec<TemplateQuestion>,
                   prompt_template: &str| ContentTemplate {
        id: EntityId::new_v4(),
        name: name.to_string(),
        origin: TemplateOrigin::BuiltIn,
        industry: industry.to_string(),
        description: description.to_string(),
        questions,
        prompt_template: prompt_template.to_string(),
        requested_types: vec![AssetKind::Background],
        is_active: true,
        created_at: now,
        owner_id: None,
    };

    vec![
        builtin(
            "Automotive Services",
            "automotive",
            "Promotional visuals for garages, dealerships, and detailers.",
            vec![
                TemplateQuestion {
                    id: "businessName".to_string(),
                    prompt: "What is your business name?".to_string(),
                    kind: QuestionKind::Text,
                    options: vec![],
                    required: true,
                    placeholder: Some("e.g. Joe's Garage".to_string()),
                    max_length: Some(100),
                },
                TemplateQuestion {
                    id: "services".to_string(),
                    prompt: "Which services do you offer?".to_string(),
                    kind: QuestionKind::Multiselect,
                    options: vec![
                        "repairs".to_string(),
                        "detailing".to_string(),
                        "tyres".to_string(),
                        "sales".to_string(),
                    ],
                    required: false,
                    placeholder: None,
                    max_length: None,
                },
                TemplateQuestion {
                    id: "tone".to_string(),
                    prompt: "What tone should the visuals have?".to_string(),
                    kind: QuestionKind::Select,
                    options: vec![
                        "professional".to_string(),
                        "friendly".to_string(),
                        "bold".to_string(),
                    ],
                    required: false,
                    placeholder: None,
                    max_length: None,
                },
            ],
            "Marketing background for {businessName}, an automotive business \
             offering {services}, rendered in a {tone} tone",
        ),
        builtin(
            "Restaurant & Cafe",
            "restaurant",
            "Menu headers and social visuals for food businesses.",
            vec![
                TemplateQuestion {
                    id: "businessName".to_string(),
                    prompt: "What is your restaurant called?".to_string(),
                    kind: QuestionKind::Text,
                    options: vec![],
                    required: true,
                    placeholder: None,
                    max_length: Some(100),
                },
                TemplateQuestion {
                    id: "cuisine".to_string(),
                    prompt: "Describe your cuisine".to_string(),
                    kind: QuestionKind::Textarea,
                    options: vec![],
                    required: true,
                    placeholder: Some("e.g. wood-fired Neapolitan pizza".to_string()),
                    max_length: Some(500),
                },
            ],
            "Appetising background for {businessName}, serving {cuisine}",
        ),
        builtin(
            "Retail & E-commerce",
            "retail",
            "Banner imagery for shops and online stores.",
            vec![
                TemplateQuestion {
                    id: "storeName".to_string(),
                    prompt: "What is your store name?".to_string(),
                    kind: QuestionKind::Text,
                    options: vec![],
                    required: true,
                    placeholder: None,
                    max_length: Some(100),
                },
                TemplateQuestion {
                    id: "products".to_string(),
                    prompt: "What do you sell?".to_string(),
                    kind: QuestionKind::Text,
                    options: vec![],
                    required: false,
                    placeholder: None,
                    max_length: Some(200),
                },
            ],
            "Storefront banner for {storeName}, showcasing {products}",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
