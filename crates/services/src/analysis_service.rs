use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use study_core::model::AnalysisResult;

use crate::ai::{AnalysisModel, build_prompt, parse_analysis};
use crate::credential_service::CredentialService;
use crate::error::{AiError, AnalysisServiceError};
use crate::pdf;

const FALLBACK_FILE_NAME: &str = "document.pdf";

/// An uploaded document together with what the model generated for it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedDocument {
    file_name: String,
    analysis: AnalysisResult,
}

impl AnalyzedDocument {
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    #[must_use]
    pub fn into_analysis(self) -> AnalysisResult {
        self.analysis
    }
}

/// Runs one document through extraction and a single model request.
///
/// Any failure aborts the whole analysis. A rejected key is cleared so the
/// caller can route back to key entry.
#[derive(Clone)]
pub struct AnalysisService {
    model: Arc<dyn AnalysisModel>,
    credentials: Arc<CredentialService>,
}

impl AnalysisService {
    #[must_use]
    pub fn new(model: Arc<dyn AnalysisModel>, credentials: Arc<CredentialService>) -> Self {
        Self { model, credentials }
    }

    /// Analyze a PDF on disk.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisServiceError` for read, extraction or model failures.
    pub async fn analyze_file(&self, path: &Path) -> Result<AnalyzedDocument, AnalysisServiceError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
        let text = pdf::extract_file(path).await?;
        self.finish(file_name, &text).await
    }

    /// Analyze a PDF already loaded into memory (e.g. from a file picker).
    ///
    /// # Errors
    ///
    /// Returns `AnalysisServiceError` for extraction or model failures.
    pub async fn analyze_pdf(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalyzedDocument, AnalysisServiceError> {
        let text = pdf::extract_bytes(bytes).await?;
        let file_name = if file_name.trim().is_empty() {
            FALLBACK_FILE_NAME
        } else {
            file_name.trim()
        };
        self.finish(file_name.to_string(), &text).await
    }

    async fn finish(
        &self,
        file_name: String,
        text: &str,
    ) -> Result<AnalyzedDocument, AnalysisServiceError> {
        info!(file = %file_name, chars = text.len(), "analyzing document");
        let analysis = self.analyze_text(text).await?;
        Ok(AnalyzedDocument {
            file_name,
            analysis,
        })
    }

    /// Send extracted text to the model and validate the response.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisServiceError::Ai` when no key is available, the
    /// request fails or the response does not validate.
    pub async fn analyze_text(&self, text: &str) -> Result<AnalysisResult, AnalysisServiceError> {
        let api_key = self
            .credentials
            .current_key()
            .await
            .ok_or(AiError::MissingApiKey)?;
        let content = match self.model.generate(&api_key, &build_prompt(text)).await {
            Ok(content) => content,
            Err(AiError::Unauthorized) => {
                self.credentials.reject().await;
                return Err(AiError::Unauthorized.into());
            }
            Err(err) => {
                warn!(error = %err, "analysis request failed");
                return Err(err.into());
            }
        };
        let analysis = parse_analysis(&content).inspect_err(|err| {
            warn!(error = %err, "model response failed validation");
        })?;
        info!(
            questions = analysis.quiz().questions().len(),
            flashcards = analysis.flashcards().len(),
            "analysis complete"
        );
        Ok(analysis)
    }
}
