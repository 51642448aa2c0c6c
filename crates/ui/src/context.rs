use std::sync::Arc;

use dioxus::prelude::*;

use services::{
    AnalysisService, AnalyzedDocument, AppServices, Clock, CredentialService, ExportService,
    LibraryService, PreferencesService, QuizLoopService,
};
use study_core::model::{AnalysisResult, ArticleId, SavedArticle, Theme};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;

    fn analysis(&self) -> Arc<AnalysisService>;
    fn credentials(&self) -> Arc<CredentialService>;
    fn library(&self) -> Arc<LibraryService>;
    fn preferences(&self) -> Arc<PreferencesService>;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn exports(&self) -> Arc<ExportService>;
}

impl UiApp for AppServices {
    fn clock(&self) -> Clock {
        AppServices::clock(self)
    }

    fn analysis(&self) -> Arc<AnalysisService> {
        AppServices::analysis(self)
    }

    fn credentials(&self) -> Arc<CredentialService> {
        AppServices::credentials(self)
    }

    fn library(&self) -> Arc<LibraryService> {
        AppServices::library(self)
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        AppServices::preferences(self)
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        AppServices::quiz_loop(self)
    }

    fn exports(&self) -> Arc<ExportService> {
        AppServices::exports(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: Arc<dyn UiApp>) -> Self {
        Self { app }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.app.clock()
    }

    #[must_use]
    pub fn analysis(&self) -> Arc<AnalysisService> {
        self.app.analysis()
    }

    #[must_use]
    pub fn credentials(&self) -> Arc<CredentialService> {
        self.app.credentials()
    }

    #[must_use]
    pub fn library(&self) -> Arc<LibraryService> {
        self.app.library()
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        self.app.preferences()
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.app.quiz_loop()
    }

    #[must_use]
    pub fn exports(&self) -> Arc<ExportService> {
        self.app.exports()
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

//
// ─── OPEN DOCUMENT ─────────────────────────────────────────────────────────────
//

/// The analysis currently on screen, either fresh from an upload or
/// reopened from the library.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenDocument {
    pub file_name: String,
    pub analysis: AnalysisResult,
    pub saved_id: Option<ArticleId>,
}

impl From<AnalyzedDocument> for OpenDocument {
    fn from(document: AnalyzedDocument) -> Self {
        Self {
            file_name: document.file_name().to_string(),
            analysis: document.into_analysis(),
            saved_id: None,
        }
    }
}

impl From<&SavedArticle> for OpenDocument {
    fn from(article: &SavedArticle) -> Self {
        Self {
            file_name: article.file_name().to_string(),
            analysis: article.analysis().clone(),
            saved_id: Some(article.id().clone()),
        }
    }
}

/// Shared handle to the open document, provided at the app root.
#[derive(Clone, Copy)]
pub struct DocumentState(pub Signal<Option<OpenDocument>>);

impl DocumentState {
    #[must_use]
    pub fn current(&self) -> Option<OpenDocument> {
        self.0.read().clone()
    }

    pub fn open(&mut self, document: OpenDocument) {
        self.0.set(Some(document));
    }

    pub fn mark_saved(&mut self, id: ArticleId) {
        if let Some(document) = self.0.write().as_mut() {
            document.saved_id = Some(id);
        }
    }

    pub fn close(&mut self) {
        self.0.set(None);
    }
}

/// Current colour scheme, provided at the app root.
#[derive(Clone, Copy)]
pub struct ThemeState(pub Signal<Theme>);

impl ThemeState {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match *self.0.read() {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }
}
