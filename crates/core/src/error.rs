use thiserror::Error;

use crate::model::{
    AnalysisError, ArticleError, FlashcardError, LabelError, ProgressError, QuizError,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Flashcard(#[from] FlashcardError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Article(#[from] ArticleError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
