use std::collections::HashSet;

use study_core::model::{Question, QuizSettings, Topic};

/// Share of correct answers (in tenths) needed to pass.
const PASS_TENTHS: usize = 9;

/// Final tally of a finished quiz session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
    pub score: f64,
    pub max_score: f64,
    pub passed: bool,
    /// Topics of wrongly answered questions, first-seen order.
    pub review_topics: Vec<Topic>,
}

impl QuizOutcome {
    #[must_use]
    pub fn tally(
        questions: &[Question],
        answers: &[Option<usize>],
        settings: QuizSettings,
        score: f64,
    ) -> Self {
        let mut correct = 0;
        let mut answered = 0;
        let mut seen = HashSet::new();
        let mut review_topics = Vec::new();
        for (question, answer) in questions.iter().zip(answers) {
            let Some(selected) = answer else {
                continue;
            };
            answered += 1;
            if question.is_correct(*selected) {
                correct += 1;
            } else if seen.insert(question.topic().clone()) {
                review_topics.push(question.topic().clone());
            }
        }
        let total = questions.len();
        Self {
            correct,
            answered,
            total,
            score,
            max_score: total as f64 * settings.positive_score(),
            passed: total > 0 && correct * 10 >= total * PASS_TENTHS,
            review_topics,
        }
    }

    /// Correct answers as a whole percentage of the total.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct * 100) / self.total) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(topic: &str) -> Question {
        Question::new(
            "Q",
            ["a".into(), "b".into(), "c".into(), "d".into()],
            0,
            "",
            Topic::new(topic).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn ninety_percent_passes() {
        let questions: Vec<_> = (0..10).map(|_| question("Cardio")).collect();
        let mut answers = vec![Some(0); 10];
        answers[9] = Some(2);
        let outcome = QuizOutcome::tally(&questions, &answers, QuizSettings::default(), 9.0);
        assert!(outcome.passed);
        assert_eq!(outcome.percent(), 90);

        answers[8] = Some(1);
        let outcome = QuizOutcome::tally(&questions, &answers, QuizSettings::default(), 8.0);
        assert!(!outcome.passed);
    }

    #[test]
    fn review_topics_are_distinct_and_ordered() {
        let questions = vec![question("Renal"), question("Cardio"), question("Renal"), question("Neuro")];
        let answers = vec![Some(1), Some(0), Some(3), Some(2)];
        let outcome = QuizOutcome::tally(&questions, &answers, QuizSettings::default(), 1.0);
        let names: Vec<_> = outcome.review_topics.iter().map(Topic::as_str).collect();
        assert_eq!(names, vec!["Renal", "Neuro"]);
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.max_score, 4.0);
    }
}
