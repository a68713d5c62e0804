//! # protoc-authz-emit
//!
//! Turns extracted [`AuthzRule`]s into generated lookup tables.
//!
//! ## Available Formats
//!
//! | Format | File | Contents |
//! |--------|------|----------|
//! | `json` | `<stem>.authz.json` | Object keyed by `path\|METHOD` |
//! | `rust` | `<stem>_authz.rs` | `AUTHZ_RULES` static slice and a `lookup` function |
//!
//! ## Usage
//!
//! ```ignore
//! use protoc_authz_emit::emitter_for;
//! use protoc_authz_core::OutputFormat;
//!
//! let emitter = emitter_for(OutputFormat::Rust);
//! let name = emitter.file_name("foo/v1/foo.proto");
//! let content = emitter.render("foo/v1/foo.proto", &report.rules)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod json;
mod rust;

pub use json::JsonEmitter;
pub use rust::RustEmitter;

use protoc_authz_core::{AuthzRule, OutputFormat};
use thiserror::Error;

/// Errors while rendering generated output.
#[derive(Debug, Error)]
pub enum EmitError {
    /// JSON serialization failed.
    #[error("failed to serialize rules: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders the rules of one proto file into a generated file.
pub trait Emitter: Send + Sync {
    /// Output format produced by this emitter.
    fn format(&self) -> OutputFormat;

    /// Name of the generated file for a proto file name.
    fn file_name(&self, proto_file: &str) -> String;

    /// Renders the generated file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn render(&self, proto_file: &str, rules: &[AuthzRule]) -> Result<String, EmitError>;
}

/// Type alias for boxed Emitter trait objects.
pub type EmitterBox = Box<dyn Emitter>;

/// Returns the emitter for an output format.
#[must_use]
pub fn emitter_for(format: OutputFormat) -> EmitterBox {
    match format {
        OutputFormat::Json => Box::new(JsonEmitter::new()),
        OutputFormat::Rust => Box::new(RustEmitter::new()),
    }
}

/// Strips a trailing `.proto` from a descriptor file name.
#[must_use]
pub fn proto_stem(proto_file: &str) -> &str {
    proto_file.strip_suffix(".proto").unwrap_or(proto_file)
}
