//! Evaluation configuration and the options threaded through every evaluator call.

use crate::errors::AggError;
use bson::Bson;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_ID_KEY: &str = "_id";

static DEFAULT_CONFIG: LazyLock<Config> = LazyLock::new(Config::default);

/// Engine-level settings. `id_key` names the field consumers treat as a document's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_id_key")]
    pub id_key: String,
}

fn default_id_key() -> String {
    DEFAULT_ID_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self { id_key: default_id_key() }
    }
}

impl Config {
    /// # Errors
    /// Returns `AggError::Config` when the TOML is malformed or `id_key` is empty.
    pub fn from_toml_str(s: &str) -> Result<Self, AggError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validated()
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, AggError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AggError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Builds a config from environment variables:
    /// - `NEXUS_AGG_ID_KEY`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Same as `from_env` with an injectable lookup. Blank values fall back to defaults.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let id_key = lookup("NEXUS_AGG_ID_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_id_key);
        Self { id_key }
    }

    fn validated(self) -> Result<Self, AggError> {
        if self.id_key.is_empty() {
            return Err(AggError::Config("id_key must not be empty".into()));
        }
        Ok(self)
    }
}

/// Owned options handed in by pipeline orchestration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub config: Config,
}

impl Options {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Borrowed evaluation options with no root bound yet.
    #[must_use]
    pub const fn compute(&self) -> ComputeOptions<'_> {
        ComputeOptions { config: &self.config, root: None }
    }
}

/// Options threaded through one evaluation call chain.
///
/// `root` is bound lazily the first time a system or redact variable is resolved and is
/// never rebound further down the same chain.
#[derive(Debug, Clone, Copy)]
pub struct ComputeOptions<'a> {
    pub config: &'a Config,
    pub root: Option<&'a Bson>,
}

impl Default for ComputeOptions<'_> {
    fn default() -> Self {
        Self { config: &DEFAULT_CONFIG, root: None }
    }
}

impl<'a> ComputeOptions<'a> {
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config, root: None }
    }

    /// Returns options with `root` bound to `document` unless an ancestor already bound it.
    #[must_use]
    pub fn with_root<'s>(&self, document: &'s Bson) -> ComputeOptions<'s>
    where
        'a: 's,
    {
        ComputeOptions { config: self.config, root: Some(self.root.unwrap_or(document)) }
    }
}
