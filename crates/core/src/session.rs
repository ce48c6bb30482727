//! Labeling session: the single source of truth for attribute answers.
//!
//! A session covers one profile. The presentation layer reads and writes
//! attribute state exclusively through the methods here, and a submission
//! turns that state into records via [`LabelingSession::partition`] and the
//! document expander.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::answer::AnswerSet;
use crate::attribute::{matches_filter, Attribute};
use crate::error::CoreError;
use crate::expander::expand_documents;
use crate::profile::ProfileRef;
use crate::types::Record;

/// Base record and conflicting attribute names built from a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Identifying field plus every single-answer attribute.
    pub base: Record,
    /// Attributes answered both `Yes` and `No`, in name order.
    pub conflicting: Vec<String>,
}

impl Submission {
    /// Expand into the records to persist.
    pub fn expand(&self) -> Vec<Record> {
        expand_documents(&self.base, &self.conflicting)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelingSession {
    profile: ProfileRef,
    attributes: BTreeMap<String, Attribute>,
}

impl LabelingSession {
    /// Start a session with every question unanswered and visible.
    pub fn new<I, S>(profile: ProfileRef, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes = questions
            .into_iter()
            .map(|q| {
                let attr = Attribute::new(q);
                (attr.name.clone(), attr)
            })
            .collect();
        Self {
            profile,
            attributes,
        }
    }

    pub fn profile(&self) -> &ProfileRef {
        &self.profile
    }

    /// All attributes, ordered by name.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Attributes left visible by the last filter, ordered by name.
    pub fn visible_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().filter(|a| a.is_visible)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Replace the recorded answers for one attribute.
    pub fn set_answers(&mut self, name: &str, answers: AnswerSet) -> Result<&Attribute, CoreError> {
        let attr = self
            .attributes
            .get_mut(name)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Attribute",
                id: name.to_string(),
            })?;
        attr.answers = answers;
        Ok(&*attr)
    }

    /// Add a new unanswered question to the session.
    pub fn add_attribute(&mut self, name: &str) -> Result<&Attribute, CoreError> {
        if self.attributes.contains_key(name) {
            return Err(CoreError::Conflict(format!(
                "Attribute '{name}' already exists in this session"
            )));
        }
        let attr = self
            .attributes
            .entry(name.to_string())
            .or_insert_with(|| Attribute::new(name));
        Ok(&*attr)
    }

    /// Show only attributes whose name contains `query` (case-insensitive).
    ///
    /// A blank query shows everything. Returns whether any attribute's
    /// visibility changed.
    pub fn apply_filter(&mut self, query: &str) -> bool {
        let mut changed = false;
        for attr in self.attributes.values_mut() {
            let visible = matches_filter(&attr.name, query);
            if attr.is_visible != visible {
                attr.is_visible = visible;
                changed = true;
            }
        }
        changed
    }

    /// Split current answers into a base record and conflicting names.
    ///
    /// - one answer: written into the base record
    /// - two answers: listed as conflicting, expanded later
    /// - no answer: omitted
    ///
    /// An attribute named like `target_field` is left out entirely.
    pub fn partition(&self, target_field: &str) -> Submission {
        let mut base = Record::new();
        base.insert(
            target_field.to_string(),
            Value::String(self.profile.file_name.clone()),
        );

        let mut conflicting = Vec::new();
        // The identifying field always wins over a same-named question.
        for attr in self.attributes.values().filter(|a| a.name != target_field) {
            if let Some(answer) = attr.answers.single() {
                base.insert(attr.name.clone(), Value::String(answer.as_str().to_string()));
            } else if attr.answers.is_conflicting() {
                conflicting.push(attr.name.clone());
            }
        }

        Submission { base, conflicting }
    }

    /// Build every record this session should persist.
    pub fn expand(&self, target_field: &str) -> Vec<Record> {
        self.partition(target_field).expand()
    }
}
