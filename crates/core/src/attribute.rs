//! Attribute (question) model and validation.
//!
//! An attribute is a yes/no describable feature of a profile, e.g.
//! `"Blond hair?"`. Its name doubles as the field name in stored records.

use serde::Serialize;

use crate::answer::AnswerSet;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a question name, in characters.
pub const MAX_QUESTION_LENGTH: usize = 200;

/// Field names that a question may not shadow.
const RESERVED_FIELD_NAMES: &[&str] = &["_id"];

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// Current answer state of one question within a labeling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub answers: AnswerSet,
    /// Presentation-only flag driven by the question filter.
    pub is_visible: bool,
}

impl Attribute {
    /// A fresh, unanswered, visible attribute.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            answers: AnswerSet::new(),
            is_visible: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a question name submitted by an annotator.
///
/// Returns the trimmed name on success.
pub fn validate_question_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Question must not be empty".to_string(),
        ));
    }

    let len = trimmed.chars().count();
    if len > MAX_QUESTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Question is {len} characters long, maximum is {MAX_QUESTION_LENGTH}"
        )));
    }

    if RESERVED_FIELD_NAMES.contains(&trimmed) {
        return Err(CoreError::Validation(format!(
            "'{trimmed}' is a reserved field name"
        )));
    }

    Ok(trimmed.to_string())
}

/// Reject a question named like the field that identifies the profile.
///
/// Stored records carry the profile id under `target_field`, so a question
/// with that name would overwrite it.
pub fn ensure_not_target_field(name: &str, target_field: &str) -> Result<(), CoreError> {
    if name == target_field {
        return Err(CoreError::Validation(format!(
            "'{name}' identifies the profile and cannot be used as a question"
        )));
    }
    Ok(())
}

/// Case-insensitive substring match used by the question filter.
///
/// A blank query matches every name.
pub fn matches_filter(name: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&query.to_lowercase())
}
