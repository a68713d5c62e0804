//! # protoc-authz-core
//!
//! Extracts per-method authorization rules from protobuf services.
//!
//! Each rule combines two sources:
//!
//! - the `(proto.v1.authz)` option, read from the **source text** of the
//!   `.proto` file because it is not a registered extension
//! - the `(google.api.http)` binding, read from the **compiled descriptor**
//!   through `prost-reflect`
//!
//! The text side is a small pipeline: [`locate_method_body`] finds the rpc
//! block, [`AuthzBlockExtractor`] cuts out the option body with the
//! brace-depth [`scan_brace_span`], [`strip_comments`] removes commentary, and
//! [`parse_authz_fields`] reads the permissions and the no-auth flag.
//!
//! ## Example
//!
//! ```ignore
//! use protoc_authz_core::{Extractor, PluginRequest};
//!
//! let request = PluginRequest::decode(&stdin_bytes)?;
//! let mut extractor = Extractor::builder()
//!     .source_roots(["proto"])
//!     .build(&request.pool)?;
//!
//! for name in &request.files_to_generate {
//!     if let Some(file) = request.pool.get_file_by_name(name) {
//!         let report = extractor.extract_file(&file);
//!         println!("{} rules", report.rules.len());
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod authz_block;
mod comments;
mod config;
mod error;
mod extractor;
mod fields;
mod http;
mod locator;
mod pool;
mod scanner;
mod source;
mod types;

pub use authz_block::{AuthzBlockExtractor, DEFAULT_AUTHZ_OPTION};
pub use comments::{strip_comments, CommentMap};
pub use config::{Config, ConfigError, ExtractorConfig, OutputConfig, OutputFormat};
pub use error::{ErrorClass, ExtractError};
pub use extractor::{
    Extractor, ExtractorBuilder, MethodFailure, RpcMethod, RpcService, SetupError,
};
pub use fields::{parse_authz_fields, parse_no_auth_required, parse_permissions};
pub use http::{binding_from_rule, HttpResolver, DEFAULT_HTTP_EXTENSION, VERB_FIELDS};
pub use locator::{locate_method_body, MethodBody};
pub use pool::{pool_from_descriptor_set, PluginRequest, PoolError};
pub use scanner::{scan_brace_span, BraceSpan};
pub use source::{SourceCache, SourceDocument};
pub use types::{
    AuthzFields, AuthzRule, ExtractionReport, HttpBinding, HttpMethod, Skip, Stage,
};

/// Re-export so callers can build pools and messages with a matching version.
pub use prost_reflect;
