mod analysis;
mod article;
mod flashcard;
mod ids;
mod label;
mod preferences;
mod progress;
mod quiz;

pub use analysis::{AnalysisError, AnalysisResult};
pub use article::{ArticleError, SavedArticle};
pub use flashcard::{Flashcard, FlashcardError, FlashcardRecord};
pub use ids::ArticleId;
pub use label::{LabelError, Specialty, Topic};
pub use preferences::{
    AiSettings, AiSettingsDraft, AiSettingsError, DEFAULT_API_BASE_URL, DEFAULT_API_MODEL, Theme,
};
pub use progress::{ProgressError, QuizProgress};
pub use quiz::{OPTION_COUNT, Question, QuestionRecord, Quiz, QuizError, QuizRecord, QuizSettings};
