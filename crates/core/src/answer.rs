//! Yes/No answers recorded by an annotator for a single attribute.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The two values an attribute can take in a stored record.
///
/// Declaration order doubles as enumeration order: `Yes` sorts before `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Both answers in enumeration order.
    pub const ALL: [Answer; 2] = [Answer::Yes, Answer::No];

    /// Return the stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Parse the stored string form. Matching is exact.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            other => Err(CoreError::Validation(format!(
                "Invalid answer '{other}'. Must be one of: Yes, No"
            ))),
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of answers recorded for one attribute.
///
/// Holds zero, one, or two elements. Zero means "no opinion", one is a
/// plain value, two means the annotator marked the attribute ambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeSet<Answer>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from any sequence of answers. Duplicates collapse.
    pub fn from_answers<I: IntoIterator<Item = Answer>>(answers: I) -> Self {
        Self(answers.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The answer, if exactly one was recorded.
    pub fn single(&self) -> Option<Answer> {
        if self.0.len() == 1 {
            self.0.iter().next().copied()
        } else {
            None
        }
    }

    /// Whether both `Yes` and `No` were recorded.
    pub fn is_conflicting(&self) -> bool {
        self.0.len() == Answer::ALL.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Answer> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Answer> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = Answer>>(iter: I) -> Self {
        Self::from_answers(iter)
    }
}
