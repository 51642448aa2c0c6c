use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Flashcard, Quiz};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("summary cannot be empty")]
    EmptySummary,
}

/// Summary, quiz and flashcards generated for one uploaded document.
///
/// Produced once per upload and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    summary: String,
    quiz: Quiz,
    flashcards: Vec<Flashcard>,
}

impl AnalysisResult {
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptySummary` if the summary is blank.
    pub fn new(
        summary: impl Into<String>,
        quiz: Quiz,
        flashcards: Vec<Flashcard>,
    ) -> Result<Self, AnalysisError> {
        let summary = summary.into();
        if summary.trim().is_empty() {
            return Err(AnalysisError::EmptySummary);
        }
        Ok(Self {
            summary,
            quiz,
            flashcards,
        })
    }

    /// Summary as an HTML fragment. Callers sanitize before rendering.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }
}
