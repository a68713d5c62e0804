//! Core types for extracted rules and extraction results.

use crate::error::{ErrorClass, ExtractError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP verb a method is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    /// Returns the uppercase verb.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields parsed from one authz option block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthzFields {
    /// Required permissions, in declaration order.
    pub permissions: Vec<String>,
    /// Whether the endpoint is exempt from authentication.
    pub no_auth_required: bool,
}

impl AuthzFields {
    /// Creates fields from a permission list.
    #[must_use]
    pub fn with_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            no_auth_required: false,
        }
    }

    /// Creates fields for an endpoint that needs no authentication.
    #[must_use]
    pub fn no_auth() -> Self {
        Self {
            permissions: Vec::new(),
            no_auth_required: true,
        }
    }

    /// Renders the fields in the option block syntax the field parsers read.
    #[must_use]
    pub fn to_block_text(&self) -> String {
        let quoted: Vec<String> = self
            .permissions
            .iter()
            .map(|p| format!("\"{p}\""))
            .collect();
        format!(
            "permissions: [{}]\nno_auth_required: {}",
            quoted.join(", "),
            self.no_auth_required
        )
    }
}

/// HTTP verb and path template read from the method options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpBinding {
    /// Bound verb.
    pub method: HttpMethod,
    /// Path template, e.g. `/v1/foo/{foo_id}`.
    pub path: String,
}

/// Authorization rule assembled for one RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthzRule {
    /// Path template of the HTTP binding.
    pub http_path: String,
    /// Verb of the HTTP binding.
    pub http_method: HttpMethod,
    /// Required permissions, in declaration order.
    pub permissions: Vec<String>,
    /// Whether the endpoint is exempt from authentication.
    pub no_auth_required: bool,
}

impl AuthzRule {
    /// Joins an HTTP binding with parsed authz fields.
    #[must_use]
    pub fn new(binding: HttpBinding, fields: AuthzFields) -> Self {
        Self {
            http_path: binding.path,
            http_method: binding.method,
            permissions: fields.permissions,
            no_auth_required: fields.no_auth_required,
        }
    }

    /// Key used by generated lookup tables: `path|METHOD`.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        format!("{}|{}", self.http_path, self.http_method)
    }
}

/// Point in the per-method pipeline a method had reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Nothing extracted yet.
    Start,
    /// Authz fields were read from source text.
    AuthzExtracted,
    /// HTTP binding was read from the descriptor.
    HttpResolved,
    /// The rule was produced.
    RuleEmitted,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::AuthzExtracted => write!(f, "authz-extracted"),
            Self::HttpResolved => write!(f, "http-resolved"),
            Self::RuleEmitted => write!(f, "rule-emitted"),
        }
    }
}

/// A method excluded from the rule set, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skip {
    /// Source file the method was declared in.
    pub file: PathBuf,
    /// Service name.
    pub service: String,
    /// Method name.
    pub method: String,
    /// Last stage the method reached before failing.
    pub stage: Stage,
    /// Soft or hard.
    pub class: ErrorClass,
    /// Stable error identifier.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl Skip {
    /// Records a failed method.
    #[must_use]
    pub fn new(
        file: impl Into<PathBuf>,
        service: impl Into<String>,
        method: impl Into<String>,
        stage: Stage,
        error: &ExtractError,
    ) -> Self {
        Self {
            file: file.into(),
            service: service.into(),
            method: method.into(),
            stage,
            class: error.class(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }

    /// Returns true for hard failures.
    #[must_use]
    pub fn is_hard(&self) -> bool {
        self.class == ErrorClass::Hard
    }
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}.{}: {} [{}] {} (at {})",
            self.file.display(),
            self.service,
            self.method,
            self.class,
            self.kind,
            self.message,
            self.stage
        )
    }
}

/// Result of running extraction over one or more files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Rules in declaration order (services, then methods).
    pub rules: Vec<AuthzRule>,
    /// Methods that produced no rule.
    pub skipped: Vec<Skip>,
    /// Number of files processed.
    pub files_processed: usize,
    /// Number of methods visited.
    pub methods_seen: usize,
}

impl ExtractionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any method was skipped for a hard reason.
    #[must_use]
    pub fn has_hard_failures(&self) -> bool {
        self.skipped.iter().any(Skip::is_hard)
    }

    /// Returns skips of the given class.
    #[must_use]
    pub fn by_class(&self, class: ErrorClass) -> Vec<&Skip> {
        self.skipped.iter().filter(|s| s.class == class).collect()
    }

    /// Counts skips as `(hard, soft)`.
    #[must_use]
    pub fn count_skips(&self) -> (usize, usize) {
        let hard = self.skipped.iter().filter(|s| s.is_hard()).count();
        (hard, self.skipped.len() - hard)
    }

    /// Appends another report.
    pub fn extend(&mut self, other: Self) {
        self.rules.extend(other.rules);
        self.skipped.extend(other.skipped);
        self.files_processed += other.files_processed;
        self.methods_seen += other.methods_seen;
    }
}
