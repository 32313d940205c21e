//! Run configuration (layered: code > env > config file > defaults).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{BatonError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Settings shared by every run: endpoint, credentials, model and limits.
#[derive(Clone, PartialEq)]
pub struct RunConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_turns: usize,
    pub tracing_disabled: bool,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_turns", &self.max_turns)
            .field("tracing_disabled", &self.tracing_disabled)
            .finish()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_turns: DEFAULT_MAX_TURNS,
            tracing_disabled: false,
        }
    }
}

/// On-disk shape of `config.toml`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_turns: Option<usize>,
    tracing_disabled: Option<bool>,
}

impl RunConfig {
    /// Defaults, overlaid by the default config file (if present), then the environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        let path = default_config_path();
        if path.exists() {
            config.apply_file(&path)?;
        }
        config.apply_env();
        Ok(config)
    }

    /// Defaults overlaid by a specific TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.apply_file(path)?;
        Ok(config)
    }

    /// Defaults overlaid by the environment (`.env` is loaded if present).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay keys present in a TOML file.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let raw = fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&raw)?;
        if let Some(key) = file.api_key {
            self.api_key = Some(key);
        }
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(max_turns) = file.max_turns {
            self.max_turns = max_turns;
        }
        if let Some(disabled) = file.tracing_disabled {
            self.tracing_disabled = disabled;
        }
        Ok(())
    }

    /// Overlay process environment variables.
    pub fn apply_env(&mut self) {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay variables resolved by `lookup`.
    ///
    /// `GEMINI_API_KEY` wins over `OPENAI_API_KEY`. Unparseable numeric or
    /// boolean values are logged and skipped.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("BATON_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = lookup("BATON_MODEL") {
            self.model = model;
        }
        if let Some(raw) = lookup("BATON_MAX_TURNS") {
            match raw.trim().parse() {
                Ok(max_turns) => self.max_turns = max_turns,
                Err(_) => warn!(value = %raw, "ignoring invalid BATON_MAX_TURNS"),
            }
        }
        if let Some(raw) = lookup("BATON_TRACING_DISABLED") {
            match parse_bool(&raw) {
                Some(disabled) => self.tracing_disabled = disabled,
                None => warn!(value = %raw, "ignoring invalid BATON_TRACING_DISABLED"),
            }
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_tracing_disabled(mut self, disabled: bool) -> Self {
        self.tracing_disabled = disabled;
        self
    }

    /// The API key, or a configuration error naming the variables to set.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            BatonError::Configuration(
                "no API key configured; set GEMINI_API_KEY or OPENAI_API_KEY".to_string(),
            )
        })
    }
}

/// `~/.baton/config.toml`, falling back to `.baton/config.toml` when no home directory is known.
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".baton"))
        .unwrap_or_else(|| PathBuf::from(".baton"))
        .join("config.toml")
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
