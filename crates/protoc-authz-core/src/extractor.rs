//! Rule assembly: drives text extraction and HTTP resolution per method.

use crate::authz_block::{AuthzBlockExtractor, DEFAULT_AUTHZ_OPTION};
use crate::config::ExtractorConfig;
use crate::error::{ErrorClass, ExtractError};
use crate::fields::parse_authz_fields;
use crate::http::{HttpResolver, DEFAULT_HTTP_EXTENSION};
use crate::locator::{locate_method_body, MethodBody};
use crate::source::{SourceCache, SourceDocument};
use crate::types::{AuthzFields, AuthzRule, ExtractionReport, Skip, Stage};

use prost_reflect::{
    DescriptorPool, DynamicMessage, FileDescriptor, MethodDescriptor, ServiceDescriptor,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that prevent an [`Extractor`] from being built.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The authz option name does not produce a valid pattern.
    #[error("invalid authz option name `{name}`: {source}")]
    AuthzOption {
        /// Configured option name.
        name: String,
        /// Pattern compilation error.
        source: regex::Error,
    },
}

/// An RPC method as seen by the extractor.
///
/// Implemented for [`MethodDescriptor`]; other front-ends only need to supply
/// the name, the declaring file and the compiled options.
pub trait RpcMethod {
    /// Method name as declared, e.g. `GetFoo`.
    fn name(&self) -> &str;

    /// File name of the declaring proto, relative to the include path.
    fn source_file(&self) -> String;

    /// Compiled `google.protobuf.MethodOptions`.
    fn options(&self) -> DynamicMessage;
}

/// An RPC service as seen by the extractor.
pub trait RpcService {
    /// Method type of this service.
    type Method: RpcMethod;

    /// Service name.
    fn name(&self) -> &str;

    /// Methods in declaration order.
    fn methods(&self) -> Vec<Self::Method>;
}

impl RpcMethod for MethodDescriptor {
    fn name(&self) -> &str {
        MethodDescriptor::name(self)
    }

    fn source_file(&self) -> String {
        self.parent_file().name().to_string()
    }

    fn options(&self) -> DynamicMessage {
        MethodDescriptor::options(self)
    }
}

impl RpcService for ServiceDescriptor {
    type Method = MethodDescriptor;

    fn name(&self) -> &str {
        ServiceDescriptor::name(self)
    }

    fn methods(&self) -> Vec<MethodDescriptor> {
        ServiceDescriptor::methods(self).collect()
    }
}

/// A method that produced no rule.
#[derive(Debug)]
pub struct MethodFailure {
    /// Last stage reached.
    pub stage: Stage,
    /// Why the method stopped.
    pub error: ExtractError,
}

impl MethodFailure {
    fn at(stage: Stage, error: ExtractError) -> Self {
        Self { stage, error }
    }
}

/// Builder for configuring an [`Extractor`].
#[derive(Debug)]
pub struct ExtractorBuilder {
    authz_option: String,
    http_extension: String,
    source_roots: Vec<PathBuf>,
    documents: Vec<(String, SourceDocument)>,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self {
            authz_option: DEFAULT_AUTHZ_OPTION.to_string(),
            http_extension: DEFAULT_HTTP_EXTENSION.to_string(),
            source_roots: Vec::new(),
            documents: Vec::new(),
        }
    }
}

impl ExtractorBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the authz option name read from source text.
    #[must_use]
    pub fn authz_option(mut self, name: impl Into<String>) -> Self {
        self.authz_option = name.into();
        self
    }

    /// Sets the HTTP binding extension name read from descriptors.
    #[must_use]
    pub fn http_extension(mut self, name: impl Into<String>) -> Self {
        self.http_extension = name.into();
        self
    }

    /// Sets the directories proto sources are read from.
    #[must_use]
    pub fn source_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.source_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Registers in-memory source text for a descriptor file name.
    #[must_use]
    pub fn source(mut self, file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let document = SourceDocument::new(file_name.clone(), text);
        self.documents.push((file_name, document));
        self
    }

    /// Applies extractor settings from configuration.
    #[must_use]
    pub fn config(self, config: &ExtractorConfig) -> Self {
        self.authz_option(config.authz_option.clone())
            .http_extension(config.http_extension.clone())
            .source_roots(config.source_roots.clone())
    }

    /// Builds the extractor against a descriptor pool.
    ///
    /// If the pool does not define the HTTP extension, every method will be
    /// skipped with [`ExtractError::NoHttpAnnotation`].
    ///
    /// # Errors
    ///
    /// Returns an error if the authz option name cannot be compiled into a
    /// pattern.
    pub fn build(self, pool: &DescriptorPool) -> Result<Extractor, SetupError> {
        let authz = AuthzBlockExtractor::new(&self.authz_option).map_err(|source| {
            SetupError::AuthzOption {
                name: self.authz_option.clone(),
                source,
            }
        })?;

        let http = HttpResolver::from_pool(pool, &self.http_extension);
        if http.is_none() {
            warn!(
                "Extension {} is not defined by any input file; no method will have an HTTP binding",
                self.http_extension
            );
        }

        let mut sources = SourceCache::new(self.source_roots);
        for (file_name, document) in self.documents {
            sources.insert(file_name, document);
        }

        Ok(Extractor {
            authz,
            http,
            sources,
        })
    }
}

/// Assembles authz rules for services and files.
///
/// Use [`Extractor::builder()`] to construct an instance. Source text is
/// cached per file for the lifetime of the extractor.
#[derive(Debug)]
pub struct Extractor {
    authz: AuthzBlockExtractor,
    http: Option<HttpResolver>,
    sources: SourceCache,
}

impl Extractor {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// Extracts rules for every service of a file, in declaration order.
    pub fn extract_file(&mut self, file: &FileDescriptor) -> ExtractionReport {
        info!("Extracting authz rules from {}", file.name());

        let mut report = ExtractionReport::new();
        for service in file.services() {
            report.extend(self.extract_service(&service));
        }
        report.files_processed = 1;

        let (hard, soft) = report.count_skips();
        info!(
            "{}: {} rule(s), {} hard skip(s), {} soft skip(s)",
            file.name(),
            report.rules.len(),
            hard,
            soft
        );
        report
    }

    /// Extracts rules for every method of a service, in declaration order.
    pub fn extract_service<S: RpcService>(&mut self, service: &S) -> ExtractionReport {
        debug!("Service: {}", service.name());

        let mut report = ExtractionReport::new();
        for method in service.methods() {
            report.methods_seen += 1;
            match self.extract_method(&method) {
                Ok(rule) => report.rules.push(rule),
                Err(failure) => {
                    let skip = Skip::new(
                        method.source_file(),
                        service.name(),
                        method.name(),
                        failure.stage,
                        &failure.error,
                    );
                    match skip.class {
                        ErrorClass::Soft => debug!("Skipping {skip}"),
                        ErrorClass::Hard => warn!("Skipping {skip}"),
                    }
                    report.skipped.push(skip);
                }
            }
        }
        report
    }

    /// Produces the rule for one method, or the stage and reason it stopped.
    ///
    /// # Errors
    ///
    /// Returns a [`MethodFailure`] if either the authz fields or the HTTP
    /// binding cannot be extracted. No partial rule is ever produced.
    pub fn extract_method<M: RpcMethod>(&mut self, method: &M) -> Result<AuthzRule, MethodFailure> {
        let name = method.name();
        debug!("Method: {name}");

        let fields = self
            .extract_authz(&method.source_file(), name)
            .map_err(|e| MethodFailure::at(Stage::Start, e))?;
        debug!(
            "{name}: {} permissions={:?} no_auth_required={}",
            Stage::AuthzExtracted,
            fields.permissions,
            fields.no_auth_required
        );

        let binding = match &self.http {
            Some(resolver) => resolver.resolve(name, &method.options()),
            None => Err(ExtractError::NoHttpAnnotation {
                method: name.to_string(),
            }),
        }
        .map_err(|e| MethodFailure::at(Stage::AuthzExtracted, e))?;
        debug!(
            "{name}: {} {} {}",
            Stage::HttpResolved,
            binding.method,
            binding.path
        );

        let rule = AuthzRule::new(binding, fields);
        debug!("{name}: {} {}", Stage::RuleEmitted, rule.lookup_key());
        Ok(rule)
    }

    /// Reads the authz fields of `method` from the source of `file_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the method or its authz
    /// block is missing or malformed, or the permissions cannot be parsed.
    pub fn extract_authz(
        &mut self,
        file_name: &str,
        method: &str,
    ) -> Result<AuthzFields, ExtractError> {
        let document = self.sources.load(file_name)?;

        let body = match locate_method_body(&document.text, method) {
            MethodBody::Block(body) => body,
            MethodBody::Bodiless => {
                return Err(ExtractError::AuthzOptionsNotFound {
                    method: method.to_string(),
                })
            }
            MethodBody::NotFound => {
                return Err(ExtractError::MethodNotFound {
                    method: method.to_string(),
                    path: document.path.clone(),
                })
            }
            MethodBody::Unmatched => {
                return Err(ExtractError::UnmatchedBraces {
                    context: format!("method {method}"),
                })
            }
        };

        let block = self.authz.extract(method, body)?;
        parse_authz_fields(&block)
    }
}
