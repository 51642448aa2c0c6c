//! Turns raw model output into a validated `AnalysisResult`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use study_core::model::{
    AnalysisResult, Flashcard, FlashcardRecord, Question, QuestionRecord, Quiz, QuizSettings,
};

use crate::error::AiError;

/// Topic assigned to items the model left unlabelled.
pub const FALLBACK_TOPIC: &str = "General";
/// Title used when the model returns a blank quiz title.
pub const FALLBACK_QUIZ_TITLE: &str = "Study quiz";

/// Parse and validate a model response.
///
/// The four structural points (`summary`, `quiz`, `quiz.questions`,
/// `flashcards`) must be present with the right JSON types. Individual
/// questions or flashcards that fail validation are skipped.
///
/// # Errors
///
/// Returns `AiError` when the content is not JSON, a structural point is
/// missing, or no valid question survives.
pub fn parse_analysis(content: &str) -> Result<AnalysisResult, AiError> {
    let value: Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|err| AiError::InvalidJson(err.to_string()))?;

    let summary = value
        .get("summary")
        .and_then(Value::as_str)
        .ok_or(AiError::MissingField("summary"))?;
    let quiz = value
        .get("quiz")
        .and_then(Value::as_object)
        .ok_or(AiError::MissingField("quiz"))?;
    let raw_questions = quiz
        .get("questions")
        .and_then(Value::as_array)
        .ok_or(AiError::MissingField("quiz.questions"))?;
    let raw_flashcards = value
        .get("flashcards")
        .and_then(Value::as_array)
        .ok_or(AiError::MissingField("flashcards"))?;

    let questions: Vec<Question> = collect_valid::<QuestionRecord, Question>(raw_questions, "question");
    if questions.is_empty() {
        return Err(AiError::NoQuestions);
    }
    let flashcards: Vec<Flashcard> =
        collect_valid::<FlashcardRecord, Flashcard>(raw_flashcards, "flashcard");

    let quiz = Quiz::new(quiz_title(quiz), quiz_settings(quiz), questions)
        .map_err(|err| AiError::InvalidContent(err.to_string()))?;

    AnalysisResult::new(summary, quiz, flashcards)
        .map_err(|err| AiError::InvalidContent(err.to_string()))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn quiz_title(quiz: &Map<String, Value>) -> &str {
    quiz.get("title")
        .and_then(Value::as_str)
        .filter(|title| !title.trim().is_empty())
        .unwrap_or(FALLBACK_QUIZ_TITLE)
}

fn quiz_settings(quiz: &Map<String, Value>) -> QuizSettings {
    let defaults = QuizSettings::default();
    let Some(raw) = quiz.get("settings").and_then(Value::as_object) else {
        return defaults;
    };
    // Each delta falls back on its own; a missing one never resets the other.
    let positive = raw
        .get("positiveScore")
        .and_then(Value::as_f64)
        .unwrap_or(defaults.positive_score());
    let negative = raw
        .get("negativeScore")
        .and_then(Value::as_f64)
        .unwrap_or(defaults.negative_score());
    QuizSettings::new(positive, negative).unwrap_or_else(|err| {
        warn!(error = %err, "quiz settings unusable; falling back to defaults");
        defaults
    })
}

fn collect_valid<R, T>(items: &[Value], kind: &'static str) -> Vec<T>
where
    R: DeserializeOwned,
    T: TryFrom<R>,
    T::Error: std::fmt::Display,
{
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record: R = match serde_json::from_value(with_topic(item)) {
                Ok(record) => record,
                Err(err) => {
                    warn!(kind, index, error = %err, "skipping malformed item");
                    return None;
                }
            };
            match T::try_from(record) {
                Ok(valid) => Some(valid),
                Err(err) => {
                    warn!(kind, index, error = %err, "skipping invalid item");
                    None
                }
            }
        })
        .collect()
}

fn with_topic(item: &Value) -> Value {
    let mut item = item.clone();
    if let Some(object) = item.as_object_mut() {
        let labelled = object
            .get("topic")
            .and_then(Value::as_str)
            .is_some_and(|topic| !topic.trim().is_empty());
        if !labelled {
            object.insert("topic".into(), Value::String(FALLBACK_TOPIC.into()));
        }
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(topic: Value) -> Value {
        json!({
            "question": "First-line therapy for HFrEF?",
            "options": ["ACE inhibitor", "Digoxin", "Amiodarone", "Nitrates"],
            "correctAnswerIndex": 0,
            "explanation": "Mortality benefit.",
            "topic": topic,
        })
    }

    fn response(questions: Value) -> String {
        json!({
            "summary": "<p>Heart failure</p>",
            "quiz": {
                "title": "Heart failure",
                "settings": { "positiveScore": 2, "negativeScore": -0.5 },
                "questions": questions,
            },
            "flashcards": [
                { "term": "HFrEF", "definition": "EF below 40%", "topic": "Cardio" },
                { "term": "", "definition": "blank term", "topic": "Cardio" },
            ],
        })
        .to_string()
    }

    #[test]
    fn parses_a_well_formed_response() {
        let result = parse_analysis(&response(json!([question(json!("Cardio"))]))).unwrap();
        assert_eq!(result.summary(), "<p>Heart failure</p>");
        assert_eq!(result.quiz().title(), "Heart failure");
        assert_eq!(result.quiz().settings().positive_score(), 2.0);
        assert_eq!(result.quiz().settings().negative_score(), -0.5);
        assert_eq!(result.quiz().questions().len(), 1);
        assert_eq!(result.flashcards().len(), 1);
    }

    #[test]
    fn accepts_fenced_output() {
        let fenced = format!("```json\n{}\n```", response(json!([question(json!("Cardio"))])));
        assert!(parse_analysis(&fenced).is_ok());
    }

    #[test]
    fn missing_structural_points_are_errors() {
        let cases = [
            (json!({ "quiz": { "questions": [] }, "flashcards": [] }), "summary"),
            (json!({ "summary": "s", "quiz": [], "flashcards": [] }), "quiz"),
            (json!({ "summary": "s", "quiz": {}, "flashcards": [] }), "quiz.questions"),
            (json!({ "summary": "s", "quiz": { "questions": [] } }), "flashcards"),
        ];
        for (value, field) in cases {
            let err = parse_analysis(&value.to_string()).unwrap_err();
            assert!(
                matches!(err, AiError::MissingField(missing) if missing == field),
                "expected missing {field}, got {err:?}"
            );
        }
    }

    #[test]
    fn non_json_is_rejected() {
        assert!(matches!(
            parse_analysis("I cannot help with that."),
            Err(AiError::InvalidJson(_))
        ));
    }

    #[test]
    fn invalid_questions_are_skipped_and_blank_topics_relabelled() {
        let mut broken = question(json!("Cardio"));
        broken["options"] = json!(["only", "three", "options"]);
        let result =
            parse_analysis(&response(json!([broken, question(json!("  "))]))).unwrap();
        let questions = result.quiz().questions();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].topic().as_str(), FALLBACK_TOPIC);
    }

    #[test]
    fn zero_valid_questions_is_an_error() {
        let mut broken = question(json!("Cardio"));
        broken["correctAnswerIndex"] = json!(7);
        assert!(matches!(
            parse_analysis(&response(json!([broken]))),
            Err(AiError::NoQuestions)
        ));
    }

    #[test]
    fn missing_settings_default_to_plus_one_zero() {
        let mut value: Value =
            serde_json::from_str(&response(json!([question(json!("Cardio"))]))).unwrap();
        value["quiz"].as_object_mut().unwrap().remove("settings");
        let result = parse_analysis(&value.to_string()).unwrap();
        assert_eq!(result.quiz().settings(), QuizSettings::default());
    }

    #[test]
    fn a_missing_score_keeps_the_other_one() {
        let mut value: Value =
            serde_json::from_str(&response(json!([question(json!("Cardio"))]))).unwrap();
        value["quiz"]["settings"] = json!({ "positiveScore": 2 });
        let settings = parse_analysis(&value.to_string()).unwrap().quiz().settings();
        assert_eq!(settings.positive_score(), 2.0);
        assert_eq!(settings.negative_score(), 0.0);

        value["quiz"]["settings"] = json!({ "negativeScore": -1 });
        let settings = parse_analysis(&value.to_string()).unwrap().quiz().settings();
        assert_eq!(settings.positive_score(), 1.0);
        assert_eq!(settings.negative_score(), -1.0);
    }
}
