//! Locating `protoc-authz.toml`.
//!
//! protoc starts plugins without arguments, so plugin runs can only name a
//! config file through the environment. Resolution order:
//!
//! 1. `--config <path>`
//! 2. `$PROTOC_AUTHZ_CONFIG`
//! 3. `protoc-authz.toml` or `.protoc-authz.toml` in the working directory
//! 4. `config.toml` in `$PROTOC_AUTHZ_CONFIG_DIR`, else in `~/.protoc-authz/`
//! 5. built-in defaults
//!
//! Paths from steps 1 and 2 are taken as given; a missing file there is an
//! error when loading, not a reason to fall through.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Names an explicit config file.
pub const CONFIG_ENV: &str = "PROTOC_AUTHZ_CONFIG";

/// Overrides the per-user config directory.
pub const CONFIG_DIR_ENV: &str = "PROTOC_AUTHZ_CONFIG_DIR";

const PROJECT_FILES: [&str; 2] = ["protoc-authz.toml", ".protoc-authz.toml"];
const USER_FILE: &str = "config.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line.
    Flag(PathBuf),
    /// `$PROTOC_AUTHZ_CONFIG`.
    Env(PathBuf),
    /// Config file in the working directory.
    Project(PathBuf),
    /// Per-user config file.
    User(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the file to load, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::Env(p) | Self::Project(p) | Self::User(p) => Some(p),
            Self::Default => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(p) => write!(f, "{} (--config)", p.display()),
            Self::Env(p) => write!(f, "{} (${CONFIG_ENV})", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::User(p) => write!(f, "{} (user)", p.display()),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

/// Environment inputs to resolution, captured once.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    env_config: Option<PathBuf>,
    user_dir: Option<PathBuf>,
}

impl Resolver {
    /// Reads `$PROTOC_AUTHZ_CONFIG`, `$PROTOC_AUTHZ_CONFIG_DIR` and the home
    /// directory.
    #[must_use]
    pub fn from_env() -> Self {
        let user_dir = non_empty(std::env::var_os(CONFIG_DIR_ENV))
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|h| h.join(".protoc-authz")));
        Self {
            env_config: non_empty(std::env::var_os(CONFIG_ENV)).map(PathBuf::from),
            user_dir,
        }
    }

    /// Sets the path `$PROTOC_AUTHZ_CONFIG` would supply.
    #[must_use]
    pub fn with_env_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_config = Some(path.into());
        self
    }

    /// Sets the per-user config directory.
    #[must_use]
    pub fn with_user_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(dir.into());
        self
    }

    /// Picks the config for a run in `work_dir`.
    #[must_use]
    pub fn resolve(&self, work_dir: &Path, flag: Option<&Path>) -> ConfigSource {
        if let Some(p) = flag {
            return ConfigSource::Flag(p.to_path_buf());
        }
        if let Some(p) = &self.env_config {
            return ConfigSource::Env(p.clone());
        }

        if let Some(p) = PROJECT_FILES
            .iter()
            .map(|name| work_dir.join(name))
            .find(|p| p.is_file())
        {
            return ConfigSource::Project(p);
        }

        match &self.user_dir {
            Some(dir) if dir.join(USER_FILE).is_file() => ConfigSource::User(dir.join(USER_FILE)),
            _ => ConfigSource::Default,
        }
    }
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.is_empty())
}
