use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use study_core::model::{OPTION_COUNT, Question, Quiz, QuizProgress, QuizSettings};
use study_core::sampling::{SessionKind, Shuffle};

use super::outcome::QuizOutcome;
use super::selection::TopicSelection;
use crate::error::QuizSessionError;

/// How long after an answer the explanation becomes visible.
pub const EXPLANATION_DELAY_MS: i64 = 1_500;

//
// ─── CONFIGURING ───────────────────────────────────────────────────────────────
//

/// Topic and count selection before a quiz starts.
#[derive(Debug, Clone)]
pub struct QuizSetup {
    quiz: Quiz,
    selection: TopicSelection<Question>,
}

impl QuizSetup {
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        let selection = TopicSelection::new(quiz.questions().to_vec(), SessionKind::Quiz);
        Self { quiz, selection }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn selection(&self) -> &TopicSelection<Question> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut TopicSelection<Question> {
        &mut self.selection
    }

    /// Draw a Fisher–Yates sample of the filtered questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` when no question matches the
    /// selected topics.
    pub fn start<R: Rng>(&self, rng: &mut R) -> Result<QuizSession, QuizSessionError> {
        let questions = self.selection.draw(Shuffle::FisherYates, rng);
        QuizSession::new(&self.quiz, questions, self.selection.count())
    }
}

//
// ─── IN PROGRESS ───────────────────────────────────────────────────────────────
//

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerVerdict {
    pub question_index: usize,
    pub selected: usize,
    pub correct: bool,
    pub score_delta: f64,
    /// The question had been answered before; nothing changed.
    pub already_answered: bool,
}

/// What happened after moving past the current question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizStep {
    Next { index: usize },
    Finished(QuizOutcome),
}

/// One quiz run over a sampled subset of questions.
///
/// Each question accepts exactly one answer. The explanation is revealed
/// `EXPLANATION_DELAY_MS` after answering, and the session only advances
/// once the current question is answered.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz_title: String,
    settings: QuizSettings,
    questions: Vec<Question>,
    current: usize,
    score: f64,
    answers: Vec<Option<usize>>,
    answered_at: Option<DateTime<Utc>>,
    requested_count: usize,
    finished: bool,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` if `questions` is empty.
    pub fn new(
        quiz: &Quiz,
        questions: Vec<Question>,
        requested_count: usize,
    ) -> Result<Self, QuizSessionError> {
        if questions.is_empty() {
            return Err(QuizSessionError::Empty);
        }
        Ok(Self {
            quiz_title: quiz.title().to_string(),
            settings: quiz.settings(),
            answers: vec![None; questions.len()],
            questions,
            current: 0,
            score: 0.0,
            answered_at: None,
            requested_count,
            finished: false,
        })
    }

    /// Rebuild a session from a saved snapshot, field for field.
    ///
    /// An answered current question shows its explanation immediately.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::StaleProgress` when the snapshot belongs to
    /// another quiz, or `QuizSessionError::Progress` when it is inconsistent.
    pub fn resume(quiz: &Quiz, progress: QuizProgress) -> Result<Self, QuizSessionError> {
        if !progress.matches_quiz(quiz.title()) {
            return Err(QuizSessionError::StaleProgress);
        }
        progress.check()?;
        Ok(Self {
            quiz_title: progress.quiz_title,
            settings: quiz.settings(),
            questions: progress.questions,
            current: progress.current_index,
            score: progress.score,
            answers: progress.answers,
            answered_at: None,
            requested_count: progress.requested_count,
            finished: false,
        })
    }

    #[must_use]
    pub fn quiz_title(&self) -> &str {
        &self.quiz_title
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// Option chosen for the current question, if answered.
    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.answers[self.current]
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn requested_count(&self) -> usize {
        self.requested_count
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Answer the current question.
    ///
    /// A repeated answer returns the original verdict with
    /// `already_answered` set and leaves the score untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Finished` after the last question, or
    /// `QuizSessionError::InvalidOption` for an index outside the options.
    pub fn answer(
        &mut self,
        option: usize,
        now: DateTime<Utc>,
    ) -> Result<AnswerVerdict, QuizSessionError> {
        if self.finished {
            return Err(QuizSessionError::Finished);
        }
        if let Some(selected) = self.current_answer() {
            let correct = self.current_question().is_correct(selected);
            return Ok(AnswerVerdict {
                question_index: self.current,
                selected,
                correct,
                score_delta: self.settings.delta(correct),
                already_answered: true,
            });
        }
        if option >= OPTION_COUNT {
            return Err(QuizSessionError::InvalidOption { index: option });
        }

        let correct = self.current_question().is_correct(option);
        let score_delta = self.settings.delta(correct);
        self.score += score_delta;
        self.answers[self.current] = Some(option);
        self.answered_at = Some(now);
        Ok(AnswerVerdict {
            question_index: self.current,
            selected: option,
            correct,
            score_delta,
            already_answered: false,
        })
    }

    /// When the current explanation becomes visible, if answered.
    #[must_use]
    pub fn explanation_reveal_at(&self) -> Option<DateTime<Utc>> {
        self.current_answer()?;
        Some(match self.answered_at {
            Some(at) => at + Duration::milliseconds(EXPLANATION_DELAY_MS),
            None => DateTime::<Utc>::MIN_UTC,
        })
    }

    #[must_use]
    pub fn explanation_visible(&self, now: DateTime<Utc>) -> bool {
        self.explanation_reveal_at().is_some_and(|at| now >= at)
    }

    /// Move past the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NotAnswered` if the current question has no
    /// answer yet, or `QuizSessionError::Finished` if the quiz already ended.
    pub fn advance(&mut self) -> Result<QuizStep, QuizSessionError> {
        if self.finished {
            return Err(QuizSessionError::Finished);
        }
        if self.current_answer().is_none() {
            return Err(QuizSessionError::NotAnswered);
        }
        if self.is_last() {
            self.finished = true;
            return Ok(QuizStep::Finished(self.outcome()));
        }
        self.current += 1;
        self.answered_at = None;
        Ok(QuizStep::Next {
            index: self.current,
        })
    }

    #[must_use]
    pub fn outcome(&self) -> QuizOutcome {
        QuizOutcome::tally(&self.questions, &self.answers, self.settings, self.score)
    }

    /// Snapshot for crash-resume.
    #[must_use]
    pub fn snapshot(&self) -> QuizProgress {
        QuizProgress {
            quiz_title: self.quiz_title.clone(),
            questions: self.questions.clone(),
            current_index: self.current,
            score: self.score,
            answers: self.answers.clone(),
            requested_count: self.requested_count,
        }
    }
}
