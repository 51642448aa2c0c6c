mod csv;
mod doc;

use std::path::{Path, PathBuf};

use tracing::info;

use study_core::model::{Flashcard, Quiz};

use crate::error::ExportError;

pub use csv::{CSV_HEADER, escape_field, flashcards_from_csv, flashcards_to_csv, parse_csv};
pub use doc::quiz_to_doc;

/// Writes flashcard and quiz exports into one directory.
#[derive(Clone, Debug)]
pub struct ExportService {
    dir: PathBuf,
}

impl ExportService {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `<stem>-flashcards.csv` and return its path.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` if the directory or file cannot be written.
    pub async fn write_flashcards(
        &self,
        source_name: &str,
        cards: &[Flashcard],
    ) -> Result<PathBuf, ExportError> {
        let path = self.path_for(source_name, "flashcards.csv");
        self.write(&path, flashcards_to_csv(cards)).await?;
        Ok(path)
    }

    /// Write `<stem>-quiz.doc` and return its path.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` if the directory or file cannot be written.
    pub async fn write_quiz(&self, source_name: &str, quiz: &Quiz) -> Result<PathBuf, ExportError> {
        let path = self.path_for(source_name, "quiz.doc");
        self.write(&path, quiz_to_doc(quiz)).await?;
        Ok(path)
    }

    fn path_for(&self, source_name: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}-{suffix}", export_stem(source_name)))
    }

    async fn write(&self, path: &Path, contents: String) -> Result<(), ExportError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(path, contents).await?;
        info!(path = %path.display(), "export written");
        Ok(())
    }
}

/// File-name stem for exports: extension dropped, anything other than
/// letters, digits, `-` and `_` replaced with `_`.
#[must_use]
pub fn export_stem(source_name: &str) -> String {
    let name = source_name.trim();
    let stem = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name);
    let cleaned: String = stem
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "study".to_string()
    } else {
        cleaned.to_string()
    }
}
