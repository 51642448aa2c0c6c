use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::label::{LabelError, Topic};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("flashcard term cannot be empty")]
    EmptyTerm,

    #[error("flashcard definition cannot be empty")]
    EmptyDefinition,

    #[error(transparent)]
    Topic(#[from] LabelError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardRecord {
    pub term: String,
    pub definition: String,
    pub topic: String,
}

/// A term/definition pair tagged with a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlashcardRecord", into = "FlashcardRecord")]
pub struct Flashcard {
    term: String,
    definition: String,
    topic: Topic,
}

impl Flashcard {
    /// Build a flashcard. Term and definition are trimmed but may not be blank.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError` when the term or definition is blank.
    pub fn new(
        term: impl Into<String>,
        definition: impl Into<String>,
        topic: Topic,
    ) -> Result<Self, FlashcardError> {
        let term = term.into().trim().to_string();
        if term.is_empty() {
            return Err(FlashcardError::EmptyTerm);
        }
        let definition = definition.into().trim().to_string();
        if definition.is_empty() {
            return Err(FlashcardError::EmptyDefinition);
        }
        Ok(Self {
            term,
            definition,
            topic,
        })
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }
}

impl TryFrom<FlashcardRecord> for Flashcard {
    type Error = FlashcardError;

    fn try_from(record: FlashcardRecord) -> Result<Self, Self::Error> {
        Self::new(record.term, record.definition, Topic::new(record.topic)?)
    }
}

impl From<Flashcard> for FlashcardRecord {
    fn from(card: Flashcard) -> Self {
        Self {
            term: card.term,
            definition: card.definition,
            topic: card.topic.into(),
        }
    }
}
