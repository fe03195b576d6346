//! Span-based text edits.
//!
//! Edits replace byte ranges of the original source; everything outside the
//! replaced spans is carried over byte for byte, which is what keeps leading
//! comments, blank lines, and indentation intact across a rewrite.

use crate::errors::{LintError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }
}

/// Apply a set of non-overlapping edits to `source`, returning the new text.
/// The input string is untouched; callers drop stale trees derived from it.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(source.len() + 16);
    let mut cursor = 0usize;
    for edit in sorted {
        if edit.start < cursor
            || edit.end < edit.start
            || edit.end > source.len()
            || !source.is_char_boundary(edit.start)
            || !source.is_char_boundary(edit.end)
        {
            return Err(LintError::internal(format!(
                "overlapping or out-of-bounds edit at {}..{}",
                edit.start, edit.end
            )));
        }
        out.push_str(&source[cursor..edit.start]);
        out.push_str(&edit.replacement);
        cursor = edit.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_replacement() {
        let edits = [TextEdit::replace(4, 9, "Task")];
        assert_eq!(apply_edits("    void Main()", &edits).unwrap(), "    Task Main()");
    }

    #[test]
    fn test_edits_applied_in_span_order() {
        let edits = [TextEdit::replace(8, 11, "two"), TextEdit::replace(0, 3, "one")];
        assert_eq!(apply_edits("aaa bbb ccc", &edits).unwrap(), "one bbb two");
    }

    #[test]
    fn test_insertion_keeps_surrounding_text() {
        let edits = [TextEdit::insert(5, "async ")];
        assert_eq!(apply_edits("    \nvoid M()", &edits).unwrap(), "    \nasync void M()");
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let edits = [TextEdit::replace(0, 5, "x"), TextEdit::replace(3, 8, "y")];
        assert!(apply_edits("0123456789", &edits).is_err());
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let edits = [TextEdit::replace(0, 99, "x")];
        assert!(apply_edits("short", &edits).is_err());
    }
}
