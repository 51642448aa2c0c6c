#![forbid(unsafe_code)]

pub mod ai;
pub mod analysis_service;
pub mod app_services;
pub mod credential_service;
pub mod error;
pub mod export;
pub mod library_service;
pub mod pdf;
pub mod preferences_service;
pub mod sessions;
pub mod shell;

pub use study_core::Clock;

pub use ai::{AnalysisModel, OpenAiClient};
pub use analysis_service::{AnalysisService, AnalyzedDocument};
pub use app_services::{AppServices, ServicesConfig};
pub use credential_service::CredentialService;
pub use error::{
    AiError, AnalysisServiceError, AppServicesError, CredentialError, ExportError,
    FlashcardSessionError, LibraryServiceError, PdfError, QuizSessionError, ShellError,
};
pub use export::ExportService;
pub use library_service::{LibraryService, SaveArticleDraft, SaveOutcome, SpecialtyGroup};
pub use preferences_service::PreferencesService;
pub use sessions::{
    AnswerVerdict, CardFace, FlashcardDeck, FlashcardSetup, ProgressUpdate, QuizLoopService,
    QuizOutcome, QuizSession, QuizSetup, QuizStep, TopicSelection,
};
