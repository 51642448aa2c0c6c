//! PDF text extraction.
//!
//! `pdf_extract` can panic on malformed input, so every call runs inside
//! `catch_unwind`. Pages are cleaned independently and joined with a blank
//! line; a document with no text left after cleaning is an error.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::debug;

use crate::error::PdfError;

fn extract_pages(data: &[u8]) -> Result<Vec<String>, PdfError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(err)) => Err(PdfError::Extraction(err.to_string())),
        Err(_) => Err(PdfError::Panicked),
    }
}

/// Clean one page: stitch hyphenated line breaks, collapse runs of spaces and
/// tabs, trim every line and squeeze blank runs to a single empty line.
#[must_use]
pub fn clean_page(raw: &str) -> String {
    let stitched = stitch_hyphenation(raw);
    let mut out = String::with_capacity(stitched.len());
    let mut previous_blank = true;
    for line in stitched.lines() {
        let line = collapse_spaces(line);
        if line.is_empty() {
            if !previous_blank {
                out.push('\n');
            }
            previous_blank = true;
        } else {
            out.push_str(&line);
            out.push('\n');
            previous_blank = false;
        }
    }
    out.trim_matches('\n').to_string()
}

/// `"cardio-\nvascular"` becomes `"cardiovascular"`. Only a hyphen that ends
/// a line and is followed by a lowercase letter is treated as a break.
fn stitch_hyphenation(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let mut out = String::with_capacity(raw.len());
    let mut carry = String::new();
    for (index, line) in lines.iter().enumerate() {
        let mut current = std::mem::take(&mut carry);
        if current.is_empty() {
            current.push_str(line);
        } else {
            current.push_str(line.trim_start());
        }
        let next_starts_lower = lines
            .get(index + 1)
            .and_then(|next| next.trim_start().chars().next())
            .is_some_and(char::is_lowercase);
        match current.trim_end().strip_suffix('-') {
            Some(stem)
                if next_starts_lower && stem.chars().last().is_some_and(char::is_alphabetic) =>
            {
                carry = stem.to_string();
            }
            _ => {
                out.push_str(&current);
                out.push('\n');
            }
        }
    }
    out.push_str(&carry);
    out
}

fn collapse_spaces(line: &str) -> String {
    line.split([' ', '\t'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the cleaned text of an in-memory PDF.
///
/// # Errors
///
/// Returns `PdfError` when the library fails or panics, or when no page has
/// any text.
pub fn extract_text(data: &[u8]) -> Result<String, PdfError> {
    let pages = extract_pages(data)?;
    let total = pages.len();
    let cleaned: Vec<String> = pages
        .iter()
        .map(|page| clean_page(page))
        .filter(|page| !page.is_empty())
        .collect();
    debug!(pages = total, with_text = cleaned.len(), "extracted pdf text");
    if cleaned.is_empty() {
        return Err(PdfError::NoText);
    }
    Ok(cleaned.join("\n\n"))
}

/// Read and extract a PDF from disk without blocking the async runtime.
///
/// # Errors
///
/// Returns `PdfError::Read` if the file cannot be read, otherwise as
/// [`extract_text`].
pub async fn extract_file(path: &Path) -> Result<String, PdfError> {
    let data = tokio::fs::read(path).await?;
    extract_bytes(data).await
}

/// Extract an owned buffer on the blocking pool.
///
/// # Errors
///
/// As [`extract_text`]; a cancelled blocking task reports `PdfError::Panicked`.
pub async fn extract_bytes(data: Vec<u8>) -> Result<String, PdfError> {
    tokio::task::spawn_blocking(move || extract_text(&data))
        .await
        .map_err(|_| PdfError::Panicked)?
}
