//! Plain-text quiz handout that word processors open as a `.doc`.

use std::fmt::Write as _;

use study_core::model::Quiz;

const BOM: char = '\u{feff}';
const LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Render the quiz: numbered questions with lettered options, then an answer
/// key with explanations.
#[must_use]
pub fn quiz_to_doc(quiz: &Quiz) -> String {
    let mut out = String::new();
    out.push(BOM);
    let _ = writeln!(out, "{}\r", quiz.title());
    out.push_str("\r\n");

    for (number, question) in quiz.questions().iter().enumerate() {
        let _ = writeln!(out, "{}. {}\r", number + 1, question.text());
        for (letter, option) in LETTERS.iter().zip(question.options()) {
            let _ = writeln!(out, "   {letter}) {option}\r");
        }
        out.push_str("\r\n");
    }

    out.push_str("Answer key\r\n\r\n");
    for (number, question) in quiz.questions().iter().enumerate() {
        let letter = LETTERS[question.correct_index()];
        let _ = write!(out, "{}. {letter}) {}", number + 1, question.correct_option());
        if !question.explanation().is_empty() {
            let _ = write!(out, " - {}", question.explanation());
        }
        out.push_str("\r\n");
    }
    out
}
