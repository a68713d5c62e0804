//! Brace-depth scanning over raw source text.

/// Interior of a matched `{ ... }` pair as a half-open byte range.
///
/// `end` is the index of the closing brace, so `&text[span.start..span.end]`
/// is the body without its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceSpan {
    /// First byte after the opening brace.
    pub start: usize,
    /// Index of the matching closing brace.
    pub end: usize,
}

impl BraceSpan {
    /// Returns the text inside the braces.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// Offset just past the closing brace.
    #[must_use]
    pub fn after(&self) -> usize {
        self.end + 1
    }
}

/// Finds the brace closing the block that starts at `start`.
///
/// `start` must point just after an opening brace that has already been
/// consumed, so scanning begins at depth 1. String literals are not
/// special-cased: a `{` inside quotes counts like any other.
///
/// Returns `None` if the text ends before depth returns to zero.
#[must_use]
pub fn scan_brace_span(text: &str, start: usize) -> Option<BraceSpan> {
    let bytes = text.as_bytes();
    if start > bytes.len() {
        return None;
    }

    let mut depth: usize = 1;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(BraceSpan { start, end: i });
                }
            }
            _ => {}
        }
    }

    None
}
