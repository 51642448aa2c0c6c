use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use storage::repository::ProgressRepository;
use study_core::model::{Quiz, QuizProgress};

use super::quiz::{AnswerVerdict, QuizSession, QuizSetup, QuizStep};
use crate::Clock;
use crate::error::QuizSessionError;

/// Storage work owed after a session changed.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ProgressUpdate {
    Save(QuizProgress),
    Clear,
    Keep,
}

/// Quiz sessions with crash-resume.
///
/// The session is snapshotted after every answer and every advance, cleared
/// when the quiz finishes or restarts, and overwritten by any newer session.
/// Storage failures are logged; the in-memory session keeps going.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// Saved progress for `quiz`, if any.
    ///
    /// A snapshot for another quiz, or one that cannot be read, is cleared
    /// and never offered.
    pub async fn pending_resume(&self, quiz: &Quiz) -> Option<QuizProgress> {
        let snapshot = match self.progress.load_progress().await {
            Ok(snapshot) => snapshot?,
            Err(err) => {
                warn!(error = %err, "unreadable quiz progress; discarding");
                self.clear().await;
                return None;
            }
        };
        if !snapshot.matches_quiz(quiz.title()) {
            debug!(saved = %snapshot.quiz_title, "discarding progress for another quiz");
            self.clear().await;
            return None;
        }
        if let Err(err) = snapshot.check() {
            warn!(error = %err, "inconsistent quiz progress; discarding");
            self.clear().await;
            return None;
        }
        Some(snapshot)
    }

    /// Start a fresh session, dropping any earlier snapshot.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` when nothing matches the selection.
    pub async fn start<R: Rng>(
        &self,
        setup: &QuizSetup,
        rng: &mut R,
    ) -> Result<QuizSession, QuizSessionError> {
        let session = setup.start(rng)?;
        self.clear().await;
        info!(
            quiz = %session.quiz_title(),
            questions = session.total(),
            "quiz started"
        );
        Ok(session)
    }

    /// Continue from a saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError` if the snapshot is stale or inconsistent;
    /// it is cleared in that case.
    pub async fn resume(
        &self,
        quiz: &Quiz,
        snapshot: QuizProgress,
    ) -> Result<QuizSession, QuizSessionError> {
        match QuizSession::resume(quiz, snapshot) {
            Ok(session) => {
                info!(
                    quiz = %session.quiz_title(),
                    index = session.current_index(),
                    "quiz resumed"
                );
                Ok(session)
            }
            Err(err) => {
                self.clear().await;
                Err(err)
            }
        }
    }

    /// Answer the current question and snapshot the session.
    ///
    /// # Errors
    ///
    /// As [`QuizSession::answer`].
    pub async fn answer(
        &self,
        session: &mut QuizSession,
        option: usize,
    ) -> Result<AnswerVerdict, QuizSessionError> {
        let (verdict, update) = self.apply_answer(session, option)?;
        self.persist(update).await;
        Ok(verdict)
    }

    /// Answer on the live session without touching storage.
    ///
    /// Callers holding the session behind shared state apply this in place
    /// and hand the returned update to [`Self::persist`] afterwards, so a
    /// repeated answer always sees the first one.
    ///
    /// # Errors
    ///
    /// As [`QuizSession::answer`].
    pub fn apply_answer(
        &self,
        session: &mut QuizSession,
        option: usize,
    ) -> Result<(AnswerVerdict, ProgressUpdate), QuizSessionError> {
        let verdict = session.answer(option, self.clock.now())?;
        let update = if verdict.already_answered {
            ProgressUpdate::Keep
        } else {
            ProgressUpdate::Save(session.snapshot())
        };
        Ok((verdict, update))
    }

    /// Advance and snapshot, or clear the snapshot once the quiz is done.
    ///
    /// # Errors
    ///
    /// As [`QuizSession::advance`].
    pub async fn advance(&self, session: &mut QuizSession) -> Result<QuizStep, QuizSessionError> {
        let (step, update) = self.apply_advance(session)?;
        self.persist(update).await;
        Ok(step)
    }

    /// Advance the live session without touching storage.
    ///
    /// # Errors
    ///
    /// As [`QuizSession::advance`].
    pub fn apply_advance(
        &self,
        session: &mut QuizSession,
    ) -> Result<(QuizStep, ProgressUpdate), QuizSessionError> {
        let step = session.advance()?;
        let update = match &step {
            QuizStep::Next { .. } => ProgressUpdate::Save(session.snapshot()),
            QuizStep::Finished(outcome) => {
                info!(
                    quiz = %session.quiz_title(),
                    correct = outcome.correct,
                    total = outcome.total,
                    passed = outcome.passed,
                    "quiz finished"
                );
                ProgressUpdate::Clear
            }
        };
        Ok((step, update))
    }

    /// Write what an applied answer or advance left behind.
    pub async fn persist(&self, update: ProgressUpdate) {
        match update {
            ProgressUpdate::Save(snapshot) => self.save(&snapshot).await,
            ProgressUpdate::Clear => self.clear().await,
            ProgressUpdate::Keep => {}
        }
    }

    /// Abandon the current session and go back to configuration.
    pub async fn restart(&self) {
        self.clear().await;
    }

    async fn save(&self, snapshot: &QuizProgress) {
        if let Err(err) = self.progress.save_progress(snapshot).await {
            warn!(error = %err, "failed to save quiz progress");
        }
    }

    async fn clear(&self) {
        if let Err(err) = self.progress.clear_progress().await {
            warn!(error = %err, "failed to clear quiz progress");
        }
    }
}
