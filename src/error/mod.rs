//! Error types for Baton.

use thiserror::Error;

/// Primary error type for all Baton operations.
#[derive(Error, Debug)]
pub enum BatonError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Max turns ({max_turns}) exceeded")]
    MaxTurnsExceeded { max_turns: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigFile(String),
}

impl BatonError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether the caller passed something unusable (as opposed to an environment failure).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::MaxTurnsExceeded { .. }
        )
    }
}

impl From<toml::de::Error> for BatonError {
    fn from(error: toml::de::Error) -> Self {
        Self::ConfigFile(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BatonError>;
