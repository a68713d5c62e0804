//! Locating an rpc body in proto source text.

use crate::comments::CommentMap;
use crate::scanner::scan_brace_span;
use regex::Regex;

/// Outcome of searching for a method's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodBody<'a> {
    /// Text between the rpc's braces.
    Block(&'a str),
    /// The rpc is only declared with `;` and has no option body.
    Bodiless,
    /// No rpc signature with this name.
    NotFound,
    /// The rpc's opening brace is never closed.
    Unmatched,
}

/// Finds the body of `rpc <method>(...) returns (...) { ... }` in `text`.
///
/// The first live declaration of `method` that opens a block wins.
/// Declarations inside comments are ignored, and a `;`-terminated
/// declaration only counts when no block form exists, so a commented-out
/// or superseded stub never hides the real body. Names that merely share
/// a prefix do not match.
#[must_use]
pub fn locate_method_body<'a>(text: &'a str, method: &str) -> MethodBody<'a> {
    let signature = format!(
        r"\brpc\s+{}\s*\([^)]*\)\s*returns\s*\([^)]*\)\s*",
        regex::escape(method)
    );
    // An escaped name always yields a valid pattern.
    let (Ok(block), Ok(bodiless)) = (
        Regex::new(&format!(r"{signature}\{{")),
        Regex::new(&format!("{signature};")),
    ) else {
        return MethodBody::NotFound;
    };

    let comments = CommentMap::new(text);

    if let Some(open) = comments.find_live(&block, text) {
        return match scan_brace_span(text, open.end()) {
            Some(span) => MethodBody::Block(span.slice(text)),
            None => MethodBody::Unmatched,
        };
    }

    if comments.find_live(&bodiless, text).is_some() {
        MethodBody::Bodiless
    } else {
        MethodBody::NotFound
    }
}
