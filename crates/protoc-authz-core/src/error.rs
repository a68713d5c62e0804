//! Error taxonomy for per-method extraction.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// How a per-method failure should be treated by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// The method legitimately carries nothing to extract.
    Soft,
    /// Malformed input or an infrastructure failure.
    Hard,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Soft => write!(f, "soft"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Reasons a method produces no authorization rule.
#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    /// No `rpc <name>(...) returns (...) {` signature in the source text.
    #[error("method {method} not found in {}", path.display())]
    #[diagnostic(code(authz::method_not_found))]
    MethodNotFound {
        /// Method name searched for.
        method: String,
        /// Source file searched.
        path: PathBuf,
    },

    /// Brace depth never returned to zero before end of text.
    #[error("unmatched braces in {context}")]
    #[diagnostic(
        code(authz::unmatched_braces),
        help("check the rpc body and option block for a missing `}}`")
    )]
    UnmatchedBraces {
        /// What was being scanned, e.g. `method GetFoo`.
        context: String,
    },

    /// The method body has no authz option assignment.
    #[error("authz options not found for method {method}")]
    #[diagnostic(code(authz::options_not_found))]
    AuthzOptionsNotFound {
        /// Method name.
        method: String,
    },

    /// The compiled method options carry no HTTP binding extension.
    #[error("no HTTP annotation found on method {method}")]
    #[diagnostic(
        code(authz::no_http_annotation),
        help("add an `option (google.api.http) = {{ ... }}` binding to the rpc")
    )]
    NoHttpAnnotation {
        /// Method name.
        method: String,
    },

    /// The HTTP binding has none of the known verb fields set.
    #[error("no HTTP method found in binding of method {method}")]
    #[diagnostic(code(authz::no_http_method))]
    NoHttpMethodFound {
        /// Method name.
        method: String,
    },

    /// The source file could not be read.
    #[error("failed to read proto source {}: {source}", path.display())]
    #[diagnostic(code(authz::file_read))]
    FileRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The permissions list could not be parsed.
    #[error("failed to parse permissions: {message}")]
    #[diagnostic(code(authz::permissions_parse))]
    PermissionsParse {
        /// Parse error message.
        message: String,
    },
}

impl ExtractError {
    /// Classifies this error as an expected omission or a real failure.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::AuthzOptionsNotFound { .. } => ErrorClass::Soft,
            _ => ErrorClass::Hard,
        }
    }

    /// Short stable identifier, used in reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MethodNotFound { .. } => "method-not-found",
            Self::UnmatchedBraces { .. } => "unmatched-braces",
            Self::AuthzOptionsNotFound { .. } => "authz-options-not-found",
            Self::NoHttpAnnotation { .. } => "no-http-annotation",
            Self::NoHttpMethodFound { .. } => "no-http-method-found",
            Self::FileRead { .. } => "file-read",
            Self::PermissionsParse { .. } => "permissions-parse",
        }
    }
}
