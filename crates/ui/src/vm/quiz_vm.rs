use chrono::{DateTime, Utc};

use services::{QuizOutcome, QuizSession};

use crate::vm::time_fmt::format_score;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Open,
    Correct,
    Wrong,
    Dimmed,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionState::Open => "option",
            OptionState::Correct => "option correct",
            OptionState::Wrong => "option wrong",
            OptionState::Dimmed => "option dimmed",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionVm {
    pub progress_label: String,
    pub text: String,
    pub topic: String,
    pub options: Vec<OptionVm>,
    pub answered: bool,
    pub explanation: Option<String>,
    pub score_label: String,
    pub is_last: bool,
}

const LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

#[must_use]
pub fn question_vm(session: &QuizSession, now: DateTime<Utc>) -> QuestionVm {
    let question = session.current_question();
    let selected = session.current_answer();
    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let state = match selected {
                None => OptionState::Open,
                Some(_) if index == question.correct_index() => OptionState::Correct,
                Some(choice) if choice == index => OptionState::Wrong,
                Some(_) => OptionState::Dimmed,
            };
            OptionVm {
                index,
                label: format!("{}) {text}", LETTERS[index]),
                state,
            }
        })
        .collect();

    let explanation = session
        .explanation_visible(now)
        .then(|| question.explanation().to_string())
        .filter(|text| !text.is_empty());

    QuestionVm {
        progress_label: format!(
            "Question {} of {}",
            session.current_index() + 1,
            session.total()
        ),
        text: question.text().to_string(),
        topic: question.topic().to_string(),
        options,
        answered: selected.is_some(),
        explanation,
        score_label: format!("Score: {}", format_score(session.score())),
        is_last: session.is_last(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutcomeVm {
    pub headline: &'static str,
    pub score_label: String,
    pub correct_label: String,
    pub passed: bool,
    pub review_topics: Vec<String>,
}

#[must_use]
pub fn outcome_vm(outcome: &QuizOutcome) -> OutcomeVm {
    OutcomeVm {
        headline: if outcome.passed {
            "Well done, you passed!"
        } else {
            "Keep studying"
        },
        score_label: format!(
            "Score: {} / {}",
            format_score(outcome.score),
            format_score(outcome.max_score)
        ),
        correct_label: format!(
            "{} of {} correct ({}%)",
            outcome.correct,
            outcome.total,
            outcome.percent()
        ),
        passed: outcome.passed,
        review_topics: outcome
            .review_topics
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}
