//! Comment removal ahead of field parsing.

use regex::{Match, Regex};
use std::ops::Range;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*//.*$").expect("line comment regex is valid"));

#[allow(clippy::expect_used)]
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment regex is valid"));

/// Removes `//` comment lines and `/* ... */` regions from `text`.
///
/// Only lines whose first non-blank characters are `//` are dropped; a
/// trailing comment after live content on the same line is kept. Block
/// comments are matched non-greedily and may span lines.
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let without_lines = LINE_COMMENT.replace_all(text, "");
    BLOCK_COMMENT.replace_all(&without_lines, "").into_owned()
}

/// Byte ranges of the comments [`strip_comments`] would remove.
#[derive(Debug, Clone, Default)]
pub struct CommentMap {
    spans: Vec<Range<usize>>,
}

impl CommentMap {
    /// Records the comment regions of `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let spans = LINE_COMMENT
            .find_iter(text)
            .chain(BLOCK_COMMENT.find_iter(text))
            .map(|m| m.range())
            .collect();
        Self { spans }
    }

    /// Returns true if byte `pos` lies inside a comment.
    #[must_use]
    pub fn contains(&self, pos: usize) -> bool {
        self.spans.iter().any(|span| span.contains(&pos))
    }

    /// Finds the first match of `pattern` that starts outside any comment.
    ///
    /// A match starting inside a comment is retried one character later, so
    /// it cannot swallow live text that follows the comment.
    #[must_use]
    pub fn find_live<'t>(&self, pattern: &Regex, text: &'t str) -> Option<Match<'t>> {
        let mut from = 0;
        while let Some(m) = pattern.find_at(text, from) {
            if !self.contains(m.start()) {
                return Some(m);
            }
            from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}
