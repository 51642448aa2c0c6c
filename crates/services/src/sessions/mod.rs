mod flashcards;
mod outcome;
mod quiz;
mod selection;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{FlashcardSessionError, QuizSessionError};
pub use flashcards::{CardFace, FlashcardDeck, FlashcardSetup};
pub use outcome::QuizOutcome;
pub use quiz::{AnswerVerdict, EXPLANATION_DELAY_MS, QuizSession, QuizSetup, QuizStep};
pub use selection::TopicSelection;
pub use workflow::{ProgressUpdate, QuizLoopService};
