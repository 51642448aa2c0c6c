//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;
use storage::sqlite::SqliteInitError;
use study_core::model::{AiSettingsError, ArticleError, LabelError, ProgressError};

/// Errors emitted by the generative-model client and response validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    #[error("no API key is configured")]
    MissingApiKey,
    #[error("the API key was rejected")]
    Unauthorized,
    #[error("model request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("model response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("model response is missing `{0}`")]
    MissingField(&'static str),
    #[error("model response has no usable quiz questions")]
    NoQuestions,
    #[error("model response content is invalid: {0}")]
    InvalidContent(String),
}

/// Errors emitted while extracting text from a PDF.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PdfError {
    #[error("could not read the PDF: {0}")]
    Read(#[from] std::io::Error),
    #[error("PDF extraction failed: {0}")]
    Extraction(String),
    #[error("PDF extraction panicked (malformed document)")]
    Panicked,
    #[error("PDF contains no extractable text (may be scanned/image-only)")]
    NoText,
}

/// Errors emitted by `AnalysisService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisServiceError {
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error(transparent)]
    Ai(#[from] AiError),
}

impl AnalysisServiceError {
    /// The one message shown to the user when an analysis fails.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisServiceError::Pdf(PdfError::NoText) => {
                "This PDF has no selectable text. Try a text-based PDF instead of a scan."
            }
            AnalysisServiceError::Pdf(_) => "The PDF could not be read. Please try another file.",
            AnalysisServiceError::Ai(AiError::MissingApiKey | AiError::Unauthorized) => {
                "Your API key is missing or invalid. Please enter it again."
            }
            AnalysisServiceError::Ai(_) => {
                "The document could not be analyzed. Please try again."
            }
        }
    }

    /// Whether the UI should send the user back to key entry.
    #[must_use]
    pub fn requires_key_entry(&self) -> bool {
        matches!(
            self,
            AnalysisServiceError::Ai(AiError::MissingApiKey | AiError::Unauthorized)
        )
    }
}

/// Errors emitted by `CredentialService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CredentialError {
    #[error("API key cannot be empty")]
    Empty,
    #[error(transparent)]
    Validation(#[from] AiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("no questions match the selected topics")]
    Empty,
    #[error("quiz already finished")]
    Finished,
    #[error("current question has not been answered")]
    NotAnswered,
    #[error("option {index} does not exist")]
    InvalidOption { index: usize },
    #[error("saved progress belongs to another quiz")]
    StaleProgress,
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by `FlashcardDeck` setup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardSessionError {
    #[error("no flashcards match the selected topics")]
    Empty,
}

/// Errors emitted by `LibraryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryServiceError {
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error(transparent)]
    Article(#[from] ArticleError),
}

/// Errors emitted by exporters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed CSV at line {line}: {message}")]
    Csv { line: usize, message: &'static str },
}

/// Errors emitted by the app-shell asset policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShellError {
    #[error("network unavailable for {0}")]
    Offline(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Settings(#[from] AiSettingsError),
}
