use std::sync::Arc;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use services::{
    AiError, AnalysisModel, AppServices, Clock, ProgressUpdate, QuizSetup, QuizStep,
    ServicesConfig,
};
use study_core::time::fixed_now;

struct CannedModel(String);

#[async_trait]
impl AnalysisModel for CannedModel {
    async fn generate(&self, _api_key: &str, _prompt: &str) -> Result<String, AiError> {
        Ok(self.0.clone())
    }

    async fn validate_key(&self, _api_key: &str) -> Result<(), AiError> {
        Ok(())
    }
}

fn canned_response() -> String {
    let topics = ["Cardiology", "Nephrology", "Pulmonology"];
    let questions: Vec<_> = (0..12)
        .map(|i| {
            json!({
                "question": format!("Question {i}?"),
                "options": ["A", "B", "C", "D"],
                "correctAnswerIndex": i % 4,
                "explanation": format!("Explanation {i}."),
                "topic": topics[i % 3],
            })
        })
        .collect();
    json!({
        "summary": "<h3>Overview</h3><p>Internal medicine review.</p>",
        "quiz": {
            "title": "Internal medicine review",
            "settings": { "positiveScore": 1, "negativeScore": 0 },
            "questions": questions,
        },
        "flashcards": [
            { "term": "GFR", "definition": "Glomerular filtration rate", "topic": "Nephrology" },
        ],
    })
    .to_string()
}

fn services() -> AppServices {
    let config = ServicesConfig {
        env_api_key: Some("sk-test".into()),
        ..ServicesConfig::default()
    };
    AppServices::in_memory(
        Clock::fixed(fixed_now()),
        config,
        Arc::new(CannedModel(canned_response())),
    )
}

#[tokio::test]
async fn analysis_to_finished_quiz_with_resume() {
    let app = services();
    let analysis = app.analysis().analyze_text("Internal medicine notes").await.unwrap();
    let quiz = analysis.quiz().clone();

    let mut setup = QuizSetup::new(quiz.clone());
    let nephrology = setup.selection().topics()[1].clone();
    setup.selection_mut().toggle(&nephrology);
    assert_eq!(setup.selection().filtered_len(), 8);
    assert_eq!(setup.selection().count(), 8);

    let quiz_loop = app.quiz_loop();
    let mut session = quiz_loop
        .start(&setup, &mut StdRng::seed_from_u64(7))
        .await
        .unwrap();
    assert!(
        session
            .questions()
            .iter()
            .all(|q| q.topic() != &nephrology)
    );

    let correct = session.current_question().correct_index();
    quiz_loop.answer(&mut session, correct).await.unwrap();
    quiz_loop.advance(&mut session).await.unwrap();

    // a restarted app finds the snapshot and continues from question two
    let snapshot = quiz_loop.pending_resume(&quiz).await.unwrap();
    let mut resumed = quiz_loop.resume(&quiz, snapshot).await.unwrap();
    assert_eq!(resumed.current_index(), 1);
    assert_eq!(resumed.score(), 1.0);

    let outcome = loop {
        quiz_loop.answer(&mut resumed, 0).await.unwrap();
        if let QuizStep::Finished(outcome) = quiz_loop.advance(&mut resumed).await.unwrap() {
            break outcome;
        }
    };
    assert_eq!(outcome.total, 8);
    assert_eq!(outcome.answered, 8);
    assert!(quiz_loop.pending_resume(&quiz).await.is_none());
}

#[tokio::test]
async fn second_click_on_an_answered_question_is_ignored() {
    let app = services();
    let analysis = app.analysis().analyze_text("Internal medicine notes").await.unwrap();
    let quiz = analysis.quiz().clone();
    let quiz_loop = app.quiz_loop();
    let mut session = quiz_loop
        .start(&QuizSetup::new(quiz.clone()), &mut StdRng::seed_from_u64(3))
        .await
        .unwrap();

    // Both clicks land on the same live session before any write finishes.
    let (first, first_update) = quiz_loop.apply_answer(&mut session, 0).unwrap();
    let (second, second_update) = quiz_loop.apply_answer(&mut session, 1).unwrap();
    assert!(!first.already_answered);
    assert!(second.already_answered);
    assert_eq!(second.selected, 0);
    assert_eq!(second_update, ProgressUpdate::Keep);
    assert_eq!(session.current_answer(), Some(0));

    quiz_loop.persist(second_update).await;
    quiz_loop.persist(first_update).await;
    let saved = quiz_loop.pending_resume(&quiz).await.unwrap();
    assert_eq!(saved.answers[0], Some(0));
    assert_eq!(saved.score, session.score());
}
