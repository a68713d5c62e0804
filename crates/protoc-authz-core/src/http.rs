//! Resolution of the HTTP binding from compiled method options.
//!
//! Unlike the authz option, the HTTP binding (`google.api.http`) is a
//! registered extension, so it is read reflectively from the method's
//! `google.protobuf.MethodOptions` instead of from source text.

use crate::error::ExtractError;
use crate::types::{HttpBinding, HttpMethod};
use prost_reflect::{DescriptorPool, DynamicMessage, ExtensionDescriptor};
use tracing::{debug, warn};

/// Default fully qualified name of the HTTP binding extension.
pub const DEFAULT_HTTP_EXTENSION: &str = "google.api.http";

/// Verb fields of the binding message, in the order they are tried.
///
/// This follows the declaration order of `google.api.HttpRule` but is fixed
/// here, so a binding message that declares its fields differently resolves
/// the same way.
pub const VERB_FIELDS: [(&str, HttpMethod); 5] = [
    ("get", HttpMethod::Get),
    ("put", HttpMethod::Put),
    ("post", HttpMethod::Post),
    ("delete", HttpMethod::Delete),
    ("patch", HttpMethod::Patch),
];

/// Reads HTTP bindings through a known extension descriptor.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    extension: ExtensionDescriptor,
}

impl HttpResolver {
    /// Creates a resolver for an extension already looked up in a pool.
    #[must_use]
    pub fn new(extension: ExtensionDescriptor) -> Self {
        Self { extension }
    }

    /// Looks the extension up by full name, e.g. `google.api.http`.
    ///
    /// Returns `None` when the pool has no such extension, which happens if
    /// the processed files never import its definition.
    #[must_use]
    pub fn from_pool(pool: &DescriptorPool, extension_name: &str) -> Option<Self> {
        pool.get_extension_by_name(extension_name).map(Self::new)
    }

    /// Returns the extension this resolver reads.
    #[must_use]
    pub fn extension(&self) -> &ExtensionDescriptor {
        &self.extension
    }

    /// Resolves the binding declared in a method's options.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::NoHttpAnnotation`] if the extension is not set
    /// - [`ExtractError::NoHttpMethodFound`] if no verb field is set
    pub fn resolve(
        &self,
        method: &str,
        options: &DynamicMessage,
    ) -> Result<HttpBinding, ExtractError> {
        if !options.has_extension(&self.extension) {
            return Err(ExtractError::NoHttpAnnotation {
                method: method.to_string(),
            });
        }

        let value = options.get_extension(&self.extension);
        let Some(rule) = value.as_message() else {
            return Err(ExtractError::NoHttpAnnotation {
                method: method.to_string(),
            });
        };

        binding_from_rule(rule).ok_or_else(|| ExtractError::NoHttpMethodFound {
            method: method.to_string(),
        })
    }
}

/// Picks the verb and path out of a binding message.
///
/// Walks [`VERB_FIELDS`] and returns the first field that exists on the
/// message and is set. If several verbs are set the first one still wins;
/// the extra ones are logged.
#[must_use]
pub fn binding_from_rule(rule: &DynamicMessage) -> Option<HttpBinding> {
    let mut set = VERB_FIELDS.iter().filter_map(|&(field, method)| {
        if !rule.has_field_by_name(field) {
            return None;
        }
        let value = rule.get_field_by_name(field)?;
        value.as_str().map(|path| HttpBinding {
            method,
            path: path.to_string(),
        })
    });

    let binding = set.next()?;
    let ignored: Vec<HttpMethod> = set.map(|b| b.method).collect();
    if !ignored.is_empty() {
        warn!(
            "HTTP binding sets several verbs; using {} and ignoring {:?}",
            binding.method, ignored
        );
    }
    debug!("Resolved HTTP binding {} {}", binding.method, binding.path);

    Some(binding)
}
