//! Subcommand implementations.

pub mod extract;
pub mod init;
pub mod output;
pub mod plugin;

use anyhow::{Context, Result};
use protoc_authz_core::Config;

use crate::config_resolver::ConfigSource;

/// Loads the configuration a [`ConfigSource`] points at.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    tracing::debug!("Using config from {source}");
    match source.path() {
        None => Ok(Config::default()),
        Some(p) => {
            Config::from_file(p).with_context(|| format!("Failed to load config from {source}"))
        }
    }
}
