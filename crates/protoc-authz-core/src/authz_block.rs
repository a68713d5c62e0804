//! Extraction of the authz option block from an rpc body.

use crate::comments::{strip_comments, CommentMap};
use crate::error::ExtractError;
use crate::scanner::scan_brace_span;
use regex::Regex;

/// Default fully qualified name of the authz method option.
pub const DEFAULT_AUTHZ_OPTION: &str = "proto.v1.authz";

/// Locates `option (<name>) = { ... }` inside an rpc body.
#[derive(Debug, Clone)]
pub struct AuthzBlockExtractor {
    option_name: String,
    header: Regex,
}

impl AuthzBlockExtractor {
    /// Creates an extractor for the given option name, e.g. `proto.v1.authz`.
    ///
    /// # Errors
    ///
    /// Returns an error if the header pattern cannot be compiled.
    pub fn new(option_name: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"option\s*\(\s*{}\s*\)\s*=\s*\{{",
            regex::escape(option_name)
        );
        Ok(Self {
            option_name: option_name.to_string(),
            header: Regex::new(&pattern)?,
        })
    }

    /// Returns the option name this extractor looks for.
    #[must_use]
    pub fn option_name(&self) -> &str {
        &self.option_name
    }

    /// Returns the comment-free contents of the authz block in `body`.
    ///
    /// The header must be live text: a commented-out option is never used.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::AuthzOptionsNotFound`] if the body has no authz option
    /// - [`ExtractError::UnmatchedBraces`] if the block is never closed
    pub fn extract(&self, method: &str, body: &str) -> Result<String, ExtractError> {
        let header = CommentMap::new(body)
            .find_live(&self.header, body)
            .ok_or_else(|| ExtractError::AuthzOptionsNotFound {
                method: method.to_string(),
            })?;

        let span =
            scan_brace_span(body, header.end()).ok_or_else(|| ExtractError::UnmatchedBraces {
                context: format!("authz block of method {method}"),
            })?;

        Ok(strip_comments(span.slice(body)))
    }
}

impl Default for AuthzBlockExtractor {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self::new(DEFAULT_AUTHZ_OPTION).expect("default authz option is a valid pattern")
    }
}
