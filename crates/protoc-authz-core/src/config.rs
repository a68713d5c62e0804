//! Configuration types for protoc-authz.

use crate::authz_block::DEFAULT_AUTHZ_OPTION;
use crate::http::DEFAULT_HTTP_EXTENSION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Extraction settings.
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Generated output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Applies a protoc plugin parameter string such as
    /// `format=rust,strict=true,source_root=proto`.
    ///
    /// `source_root` may repeat; the first occurrence replaces the configured
    /// roots and later ones append.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys, missing `=`, or invalid values.
    pub fn apply_parameters(&mut self, parameters: &str) -> Result<(), ConfigError> {
        let mut roots_replaced = false;

        for pair in parameters.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .ok_or_else(|| ConfigError::Parameter {
                    message: format!("expected key=value, got `{pair}`"),
                })?;

            match key {
                "authz_option" => self.extractor.authz_option = value.to_string(),
                "http_extension" => self.extractor.http_extension = value.to_string(),
                "source_root" => {
                    if !roots_replaced {
                        self.extractor.source_roots.clear();
                        roots_replaced = true;
                    }
                    self.extractor.source_roots.push(PathBuf::from(value));
                }
                "strict" => self.extractor.strict = parse_bool(key, value)?,
                "emit_empty" => self.output.emit_empty = parse_bool(key, value)?,
                "format" => self.output.format = OutputFormat::parse(value)?,
                other => {
                    return Err(ConfigError::Parameter {
                        message: format!("unknown parameter `{other}`"),
                    })
                }
            }
        }

        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Parameter {
            message: format!("`{key}` expects a boolean, got `{value}`"),
        }),
    }
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Full name of the authz method option read from source text.
    #[serde(default = "default_authz_option")]
    pub authz_option: String,

    /// Full name of the HTTP binding extension read from descriptors.
    #[serde(default = "default_http_extension")]
    pub http_extension: String,

    /// Directories proto file names are resolved against, tried in order.
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<PathBuf>,

    /// Fail the run when any method is skipped for a hard reason.
    #[serde(default)]
    pub strict: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            authz_option: default_authz_option(),
            http_extension: default_http_extension(),
            source_roots: default_source_roots(),
            strict: false,
        }
    }
}

fn default_authz_option() -> String {
    DEFAULT_AUTHZ_OPTION.to_string()
}

fn default_http_extension() -> String {
    DEFAULT_HTTP_EXTENSION.to_string()
}

fn default_source_roots() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

/// Generated output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Format of the generated lookup table.
    #[serde(default)]
    pub format: OutputFormat,

    /// Generate a file even when a proto file yields no rules.
    #[serde(default)]
    pub emit_empty: bool,
}

/// Format of generated lookup tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON object keyed by `path|METHOD`.
    #[default]
    Json,
    /// Rust module with a static rule table.
    Rust,
}

impl OutputFormat {
    /// Parses a format name.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "json" => Ok(Self::Json),
            "rust" | "rs" => Ok(Self::Rust),
            other => Err(ConfigError::Parameter {
                message: format!("unknown output format `{other}`"),
            }),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Invalid plugin parameter.
    #[error("Invalid plugin parameter: {message}")]
    Parameter {
        /// What was wrong.
        message: String,
    },
}
