use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::Storage;
use study_core::model::{AiSettings, AiSettingsDraft};

use crate::Clock;
use crate::ai::{AnalysisModel, OpenAiClient};
use crate::analysis_service::AnalysisService;
use crate::credential_service::CredentialService;
use crate::error::AppServicesError;
use crate::export::ExportService;
use crate::library_service::LibraryService;
use crate::preferences_service::PreferencesService;
use crate::sessions::QuizLoopService;

pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Settings read from the environment at startup.
#[derive(Clone, Debug)]
pub struct ServicesConfig {
    pub ai: AiSettings,
    pub env_api_key: Option<String>,
    pub export_dir: PathBuf,
}

impl ServicesConfig {
    /// Read `STUDY_AI_BASE_URL`, `STUDY_AI_MODEL`, `STUDY_AI_API_KEY` and
    /// `STUDY_EXPORT_DIR`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Settings` if the base URL is invalid.
    pub fn from_env() -> Result<Self, AppServicesError> {
        let ai = AiSettingsDraft {
            api_model: env::var("STUDY_AI_MODEL").ok(),
            api_base_url: env::var("STUDY_AI_BASE_URL").ok(),
        }
        .validate()?;
        let export_dir = env::var("STUDY_EXPORT_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR), PathBuf::from);
        Ok(Self {
            ai,
            env_api_key: env::var("STUDY_AI_API_KEY").ok(),
            export_dir,
        })
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            ai: AiSettings::default(),
            env_api_key: None,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

/// Assembles app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    analysis: Arc<AnalysisService>,
    credentials: Arc<CredentialService>,
    library: Arc<LibraryService>,
    preferences: Arc<PreferencesService>,
    quiz_loop: Arc<QuizLoopService>,
    exports: Arc<ExportService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the hosted model.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: ServicesConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let model = Arc::new(OpenAiClient::new(config.ai.clone()));
        Ok(Self::from_storage(storage, clock, config, model))
    }

    /// Build services over in-memory storage.
    #[must_use]
    pub fn in_memory(clock: Clock, config: ServicesConfig, model: Arc<dyn AnalysisModel>) -> Self {
        Self::from_storage(Storage::in_memory(), clock, config, model)
    }

    #[must_use]
    pub fn from_storage(
        storage: Storage,
        clock: Clock,
        config: ServicesConfig,
        model: Arc<dyn AnalysisModel>,
    ) -> Self {
        let credentials = Arc::new(CredentialService::new(
            Arc::clone(&storage.credentials),
            Arc::clone(&model),
            config.env_api_key,
        ));
        let analysis = Arc::new(AnalysisService::new(model, Arc::clone(&credentials)));
        Self {
            clock,
            analysis,
            credentials,
            library: Arc::new(LibraryService::new(clock, Arc::clone(&storage.library))),
            preferences: Arc::new(PreferencesService::new(Arc::clone(&storage.preferences))),
            quiz_loop: Arc::new(QuizLoopService::new(clock, Arc::clone(&storage.progress))),
            exports: Arc::new(ExportService::new(config.export_dir)),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn analysis(&self) -> Arc<AnalysisService> {
        Arc::clone(&self.analysis)
    }

    #[must_use]
    pub fn credentials(&self) -> Arc<CredentialService> {
        Arc::clone(&self.credentials)
    }

    #[must_use]
    pub fn library(&self) -> Arc<LibraryService> {
        Arc::clone(&self.library)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn exports(&self) -> Arc<ExportService> {
        Arc::clone(&self.exports)
    }
}
