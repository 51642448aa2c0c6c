use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{OPTION_COUNT, Question};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("snapshot has no questions")]
    NoQuestions,

    #[error("snapshot has {answers} answers for {questions} questions")]
    AnswerCountMismatch { answers: usize, questions: usize },

    #[error("current index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("answer {selected} for question {question} is not a valid option")]
    InvalidAnswer { question: usize, selected: usize },

    #[error("snapshot score is not a finite number")]
    NonFiniteScore,
}

/// Persisted snapshot of an in-flight quiz session.
///
/// Written after every answer so a restart can offer to resume. `quiz_title`
/// is the match key: a snapshot for another quiz is stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    pub quiz_title: String,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub score: f64,
    pub answers: Vec<Option<usize>>,
    pub requested_count: usize,
}

impl QuizProgress {
    #[must_use]
    pub fn matches_quiz(&self, title: &str) -> bool {
        self.quiz_title == title
    }

    /// Whether the question the user last saw had already been answered.
    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.answers
            .get(self.current_index)
            .is_some_and(Option::is_some)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Check structural consistency of a deserialized snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` describing the first inconsistency found.
    pub fn check(&self) -> Result<(), ProgressError> {
        let len = self.questions.len();
        if len == 0 {
            return Err(ProgressError::NoQuestions);
        }
        if self.answers.len() != len {
            return Err(ProgressError::AnswerCountMismatch {
                answers: self.answers.len(),
                questions: len,
            });
        }
        if self.current_index >= len {
            return Err(ProgressError::IndexOutOfRange {
                index: self.current_index,
                len,
            });
        }
        for (question, answer) in self.answers.iter().enumerate() {
            if let Some(selected) = *answer {
                if selected >= OPTION_COUNT {
                    return Err(ProgressError::InvalidAnswer { question, selected });
                }
            }
        }
        if !self.score.is_finite() {
            return Err(ProgressError::NonFiniteScore);
        }
        Ok(())
    }
}
