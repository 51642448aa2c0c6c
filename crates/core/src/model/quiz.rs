use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::label::{LabelError, Topic};

/// Every question carries exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question text cannot be empty")]
    EmptyQuestionText,

    #[error("question must have 4 options, found {found}")]
    WrongOptionCount { found: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct option index {index} is out of range")]
    CorrectIndexOutOfRange { index: usize },

    #[error("quiz scores must be finite numbers")]
    NonFiniteScore,

    #[error(transparent)]
    Topic(#[from] LabelError),
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Quiz-level scoring: fixed deltas applied per answered question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    #[serde(default = "default_positive_score")]
    positive_score: f64,
    #[serde(default)]
    negative_score: f64,
}

fn default_positive_score() -> f64 {
    1.0
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `QuizError::NonFiniteScore` if either delta is NaN or infinite.
    pub fn new(positive_score: f64, negative_score: f64) -> Result<Self, QuizError> {
        if !positive_score.is_finite() || !negative_score.is_finite() {
            return Err(QuizError::NonFiniteScore);
        }
        Ok(Self {
            positive_score,
            negative_score,
        })
    }

    #[must_use]
    pub fn positive_score(&self) -> f64 {
        self.positive_score
    }

    #[must_use]
    pub fn negative_score(&self) -> f64 {
        self.negative_score
    }

    /// Score delta for a single answer.
    #[must_use]
    pub fn delta(&self, correct: bool) -> f64 {
        if correct {
            self.positive_score
        } else {
            self.negative_score
        }
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            positive_score: default_positive_score(),
            negative_score: 0.0,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Wire shape of a question, as produced by the model and stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    #[serde(default)]
    pub explanation: String,
    pub topic: String,
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
    explanation: String,
    topic: Topic,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuizError` if the text is blank, an option is blank or the
    /// correct index does not point at one of the options.
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
        explanation: impl Into<String>,
        topic: Topic,
    ) -> Result<Self, QuizError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuizError::EmptyQuestionText);
        }
        if let Some(index) = options.iter().position(|opt| opt.trim().is_empty()) {
            return Err(QuizError::EmptyOption { index });
        }
        if correct_index >= OPTION_COUNT {
            return Err(QuizError::CorrectIndexOutOfRange {
                index: correct_index,
            });
        }
        Ok(Self {
            text,
            options,
            correct_index,
            explanation: explanation.into().trim().to_string(),
            topic,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuizError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let found = record.options.len();
        let options: [String; OPTION_COUNT] = record
            .options
            .try_into()
            .map_err(|_| QuizError::WrongOptionCount { found })?;
        Self::new(
            record.text,
            options,
            record.correct_answer_index,
            record.explanation,
            Topic::new(record.topic)?,
        )
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            text: question.text,
            options: question.options.into(),
            correct_answer_index: question.correct_index,
            explanation: question.explanation,
            topic: question.topic.into(),
        }
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub title: String,
    #[serde(default)]
    pub settings: QuizSettings,
    pub questions: Vec<QuestionRecord>,
}

/// A titled set of questions with quiz-level scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizRecord", into = "QuizRecord")]
pub struct Quiz {
    title: String,
    settings: QuizSettings,
    questions: Vec<Question>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle` or `QuizError::NoQuestions`.
    pub fn new(
        title: impl Into<String>,
        settings: QuizSettings,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            title,
            settings,
            questions,
        })
    }

    /// Title doubles as the match key for saved progress.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl TryFrom<QuizRecord> for Quiz {
    type Error = QuizError;

    fn try_from(record: QuizRecord) -> Result<Self, Self::Error> {
        let settings = QuizSettings::new(
            record.settings.positive_score,
            record.settings.negative_score,
        )?;
        let questions = record
            .questions
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(record.title, settings, questions)
    }
}

impl From<Quiz> for QuizRecord {
    fn from(quiz: Quiz) -> Self {
        Self {
            title: quiz.title,
            settings: quiz.settings,
            questions: quiz.questions.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; OPTION_COUNT] {
        ["A".into(), "B".into(), "C".into(), "D".into()]
    }

    #[test]
    fn question_rejects_out_of_range_index() {
        let err = Question::new("Q?", options(), 4, "", Topic::new("Renal").unwrap()).unwrap_err();
        assert_eq!(err, QuizError::CorrectIndexOutOfRange { index: 4 });
    }

    #[test]
    fn question_rejects_blank_option() {
        let mut opts = options();
        opts[2] = "  ".into();
        let err = Question::new("Q?", opts, 0, "", Topic::new("Renal").unwrap()).unwrap_err();
        assert_eq!(err, QuizError::EmptyOption { index: 2 });
    }

    #[test]
    fn record_with_three_options_fails() {
        let record = QuestionRecord {
            text: "Q?".into(),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer_index: 0,
            explanation: String::new(),
            topic: "Renal".into(),
        };
        let err = Question::try_from(record).unwrap_err();
        assert_eq!(err, QuizError::WrongOptionCount { found: 3 });
    }

    #[test]
    fn quiz_parses_wire_json_with_default_settings() {
        let json = r#"{
            "title": "Heart failure",
            "questions": [{
                "question": "First-line drug?",
                "options": ["ACE inhibitor", "Digoxin", "Nitrate", "Milrinone"],
                "correctAnswerIndex": 0,
                "explanation": "Mortality benefit.",
                "topic": "Pharmacology"
            }]
        }"#;
        let quiz: Quiz = serde_json::from_str(json).unwrap();
        assert_eq!(quiz.title(), "Heart failure");
        assert_eq!(quiz.settings(), QuizSettings::default());
        assert_eq!(quiz.questions()[0].correct_option(), "ACE inhibitor");
        assert_eq!(quiz.questions()[0].topic().as_str(), "Pharmacology");
    }

    #[test]
    fn quiz_serializes_in_wire_shape() {
        let question = Question::new("Q?", options(), 1, "why", Topic::new("T").unwrap()).unwrap();
        let quiz = Quiz::new("Title", QuizSettings::new(1.0, -0.25).unwrap(), vec![question])
            .unwrap();
        let value = serde_json::to_value(&quiz).unwrap();
        assert_eq!(value["settings"]["negativeScore"], -0.25);
        assert_eq!(value["questions"][0]["correctAnswerIndex"], 1);
        assert_eq!(value["questions"][0]["question"], "Q?");
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = Quiz::new("Title", QuizSettings::default(), Vec::new()).unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);
    }

    #[test]
    fn settings_fill_only_the_missing_delta() {
        let settings: QuizSettings = serde_json::from_str(r#"{"positiveScore": 2}"#).unwrap();
        assert_eq!(settings.positive_score(), 2.0);
        assert_eq!(settings.negative_score(), 0.0);

        let settings: QuizSettings = serde_json::from_str(r#"{"negativeScore": -1}"#).unwrap();
        assert_eq!(settings.positive_score(), 1.0);
        assert_eq!(settings.negative_score(), -1.0);
    }
}
