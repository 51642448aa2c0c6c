use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnalysisResult, ArticleId, Specialty};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArticleError {
    #[error("file name cannot be empty")]
    EmptyFileName,
}

/// An analysis the user explicitly saved to the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedArticle {
    id: ArticleId,
    file_name: String,
    specialty: Specialty,
    analysis: AnalysisResult,
    saved_at: DateTime<Utc>,
}

impl SavedArticle {
    /// # Errors
    ///
    /// Returns `ArticleError::EmptyFileName` if the file name is blank.
    pub fn new(
        id: ArticleId,
        file_name: impl Into<String>,
        specialty: Specialty,
        analysis: AnalysisResult,
        saved_at: DateTime<Utc>,
    ) -> Result<Self, ArticleError> {
        let file_name = file_name.into().trim().to_string();
        if file_name.is_empty() {
            return Err(ArticleError::EmptyFileName);
        }
        Ok(Self {
            id,
            file_name,
            specialty,
            analysis,
            saved_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ArticleId {
        &self.id
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn specialty(&self) -> &Specialty {
        &self.specialty
    }

    #[must_use]
    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    #[must_use]
    pub fn saved_at(&self) -> DateTime<Utc> {
        self.saved_at
    }
}
