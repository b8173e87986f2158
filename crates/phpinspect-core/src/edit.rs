//! Span-based source rewriting
//!
//! Inspections never mutate the syntax tree; an accepted fix becomes an
//! `Edit` against the file's current text. Batch application validates
//! bounds and overlap before touching anything, so a bad edit set leaves
//! the source untouched.

use mago_span::Span;
use thiserror::Error;

/// Errors that can occur during edit application
#[derive(Error, Debug)]
pub enum EditError {
    #[error("edits starting at offsets {0} and {1} overlap")]
    OverlappingEdits(usize, usize),

    #[error("edit span {start}..{end} out of bounds for source of {len} bytes")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
}

/// A single replacement of a source range
#[derive(Debug, Clone)]
pub struct Edit {
    /// The source span to replace
    pub span: Span,
    /// The replacement text
    pub replacement: String,
    /// Human-readable description of the edit
    pub message: String,
}

impl Edit {
    pub fn new(span: Span, replacement: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            message: message.into(),
        }
    }

    /// Byte offset where this edit starts
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    /// Byte offset where this edit ends (exclusive)
    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }
}

/// Apply a set of non-overlapping edits to the source.
///
/// The output is assembled front to back: untouched segments are copied
/// verbatim, so all formatting outside the edited ranges is preserved.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|e| (e.start_offset(), e.end_offset()));

    for edit in &ordered {
        if edit.start_offset() > edit.end_offset() || edit.end_offset() > source.len() {
            return Err(EditError::SpanOutOfBounds {
                start: edit.start_offset(),
                end: edit.end_offset(),
                len: source.len(),
            });
        }
    }
    for pair in ordered.windows(2) {
        if pair[1].start_offset() < pair[0].end_offset() {
            return Err(EditError::OverlappingEdits(
                pair[0].start_offset(),
                pair[1].start_offset(),
            ));
        }
    }

    let mut result = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for edit in ordered {
        result.push_str(&source[cursor..edit.start_offset()]);
        result.push_str(&edit.replacement);
        cursor = edit.end_offset();
    }
    result.push_str(&source[cursor..]);

    Ok(result)
}
