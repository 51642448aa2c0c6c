//! Instructions and output schema sent with every analysis request.

use serde_json::{Value, json};

/// Extracted text beyond this many characters is dropped from the prompt.
pub const MAX_DOCUMENT_CHARS: usize = 120_000;

const INSTRUCTIONS: &str = "\
You are a study aid for medical students. Read the document below and produce:
1. `summary`: an HTML fragment summarizing the document for exam revision. Use \
<h3>, <p>, <ul>/<li> and <strong> only.
2. `quiz`: a title and multiple-choice questions covering the whole document. \
Every question has exactly 4 options, the zero-based index of the correct option, \
a short explanation and a short topic label.
3. `flashcards`: term/definition pairs for the key concepts, each with a topic label.
Reuse the same topic labels across questions and flashcards. Answer with JSON only.

Document:
";

/// Full prompt for one document, truncating the text to `MAX_DOCUMENT_CHARS`.
#[must_use]
pub fn build_prompt(document: &str) -> String {
    let text = truncate_chars(document, MAX_DOCUMENT_CHARS);
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + text.len());
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(text);
    prompt
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// JSON schema passed as `response_format.json_schema.schema`.
#[must_use]
pub fn response_schema() -> Value {
    let labelled = |fields: Value, required: &[&str]| {
        json!({
            "type": "object",
            "properties": fields,
            "required": required,
            "additionalProperties": false,
        })
    };

    let question = labelled(
        json!({
            "question": { "type": "string" },
            "options": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 4,
                "maxItems": 4,
            },
            "correctAnswerIndex": { "type": "integer", "minimum": 0, "maximum": 3 },
            "explanation": { "type": "string" },
            "topic": { "type": "string" },
        }),
        &["question", "options", "correctAnswerIndex", "explanation", "topic"],
    );
    let settings = labelled(
        json!({
            "positiveScore": { "type": "number" },
            "negativeScore": { "type": "number" },
        }),
        &["positiveScore", "negativeScore"],
    );
    let quiz = labelled(
        json!({
            "title": { "type": "string" },
            "settings": settings,
            "questions": { "type": "array", "items": question },
        }),
        &["title", "settings", "questions"],
    );
    let flashcard = labelled(
        json!({
            "term": { "type": "string" },
            "definition": { "type": "string" },
            "topic": { "type": "string" },
        }),
        &["term", "definition", "topic"],
    );

    labelled(
        json!({
            "summary": { "type": "string" },
            "quiz": quiz,
            "flashcards": { "type": "array", "items": flashcard },
        }),
        &["summary", "quiz", "flashcards"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_ends_with_document_text() {
        let prompt = build_prompt("Heart failure is a clinical syndrome.");
        assert!(prompt.starts_with("You are a study aid"));
        assert!(prompt.ends_with("Heart failure is a clinical syndrome."));
    }

    #[test]
    fn long_documents_are_truncated_on_char_boundaries() {
        let document = "é".repeat(MAX_DOCUMENT_CHARS + 50);
        let prompt = build_prompt(&document);
        let body = prompt.strip_prefix(INSTRUCTIONS).unwrap();
        assert_eq!(body.chars().count(), MAX_DOCUMENT_CHARS);
    }

    #[test]
    fn schema_requires_the_three_sections() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert_eq!(
            schema["properties"]["quiz"]["properties"]["questions"]["items"]["properties"]
                ["options"]["minItems"],
            4
        );
    }
}
