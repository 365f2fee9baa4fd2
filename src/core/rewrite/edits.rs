//! Byte-span text edits over the original source.
//!
//! Rewrites are expressed as edits instead of re-printing the AST, so everything
//! the rewriter does not touch (formatting, comments) is preserved verbatim.

use swc_common::Span;

use crate::core::parsers::jsx::ParsedSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset where the replaced range starts.
    pub start: usize,
    /// Byte offset where the replaced range ends (exclusive).
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

    /// Replace the source covered by `span`.
    pub fn replace_span(parsed: &ParsedSource, span: Span, replacement: impl Into<String>) -> Self {
        Self::replace(parsed.offset(span.lo), parsed.offset(span.hi), replacement)
    }
}

/// Apply non-overlapping `edits` to `source`.
///
/// Edits are applied in offset order; an insertion sorts before a replacement
/// starting at the same offset. An edit that overlaps an earlier one is skipped.
pub fn apply_edits(source: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by_key(|edit| (edit.start, edit.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in &edits {
        if edit.start < cursor || edit.end > source.len() {
            continue;
        }
        output.push_str(&source[cursor..edit.start]);
        output.push_str(&edit.replacement);
        cursor = edit.end;
    }
    output.push_str(&source[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_no_edits() {
        assert_eq!(apply_edits("const a = 1;", Vec::new()), "const a = 1;");
    }

    #[test]
    fn test_apply_out_of_order_edits() {
        let source = "f('a', 'b')";
        let edits = vec![
            TextEdit::replace(7, 10, "B"),
            TextEdit::replace(2, 5, "A"),
        ];
        assert_eq!(apply_edits(source, edits), "f(A, B)");
    }

    #[test]
    fn test_insert_before_replace_at_same_offset() {
        let edits = vec![TextEdit::replace(0, 3, "xyz"), TextEdit::insert(0, "// head\n")];
        assert_eq!(apply_edits("abc;", edits), "// head\nxyz;");
    }

    #[test]
    fn test_multibyte_offsets() {
        let source = "x = \"你好\";";
        let start = source.find('"').unwrap();
        let end = source.rfind('"').unwrap() + 1;
        let edits = vec![TextEdit::replace(start, end, "t()")];
        assert_eq!(apply_edits(source, edits), "x = t();");
    }
}
