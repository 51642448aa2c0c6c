//! Flashcard CSV with RFC 4180 quoting and CRLF line endings.

use study_core::model::{Flashcard, FlashcardRecord};

use crate::error::ExportError;

pub const CSV_HEADER: [&str; 3] = ["Term", "Definition", "Topic"];

/// Serialize flashcards; the same cards always produce the same bytes.
#[must_use]
pub fn flashcards_to_csv(cards: &[Flashcard]) -> String {
    let mut out = String::new();
    push_row(&mut out, &CSV_HEADER);
    for card in cards {
        push_row(&mut out, &[card.term(), card.definition(), card.topic().as_str()]);
    }
    out
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push_str("\r\n");
}

/// Quote a field when it contains a comma, quote, CR or LF.
#[must_use]
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse CSV text back into rows of unescaped fields.
///
/// # Errors
///
/// Returns `ExportError::Csv` for an unterminated quote or stray characters
/// after a closing quote.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, ExportError> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut line = 1;
    let mut chars = text.chars().peekable();
    let mut quoted = false;
    let mut after_quote = false;

    while let Some(ch) = chars.next() {
        if quoted {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    quoted = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            ',' => {
                row.push(std::mem::take(&mut field));
                after_quote = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                after_quote = false;
                line += 1;
            }
            '"' if field.is_empty() && !after_quote => quoted = true,
            _ if after_quote => {
                return Err(ExportError::Csv {
                    line,
                    message: "unexpected character after closing quote",
                });
            }
            _ => field.push(ch),
        }
    }

    if quoted {
        return Err(ExportError::Csv {
            line,
            message: "unterminated quoted field",
        });
    }
    if !field.is_empty() || !row.is_empty() || after_quote {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}

/// Read flashcards back from exported CSV, skipping the header.
///
/// # Errors
///
/// Returns `ExportError::Csv` for malformed CSV or rows that are not valid
/// flashcards.
pub fn flashcards_from_csv(text: &str) -> Result<Vec<Flashcard>, ExportError> {
    let rows = parse_csv(text)?;
    rows.into_iter()
        .enumerate()
        .skip(1)
        .map(|(index, row)| {
            let [term, definition, topic]: [String; 3] =
                row.try_into().map_err(|_| ExportError::Csv {
                    line: index + 1,
                    message: "expected three fields",
                })?;
            Flashcard::try_from(FlashcardRecord {
                term,
                definition,
                topic,
            })
            .map_err(|_| ExportError::Csv {
                line: index + 1,
                message: "invalid flashcard",
            })
        })
        .collect()
}
