//! Model settings and overlay resolution.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{BatonError, Result};

/// Optional parameters sent along with a model call.
///
/// Unset fields defer to the provider's defaults.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelSettings {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub tool_choice: Option<ToolChoice>,
    pub parallel_tool_calls: Option<bool>,
    pub truncation: Option<Truncation>,
    pub max_tokens: Option<u32>,
    pub metadata: Option<HashMap<String, String>>,
    pub store: Option<bool>,
    pub include_usage: Option<bool>,
}

impl ModelSettings {
    /// Overlay every field set in `override_settings` on top of `self`.
    pub fn resolve(&self, override_settings: Option<&ModelSettings>) -> ModelSettings {
        let Some(over) = override_settings else {
            return self.clone();
        };
        ModelSettings {
            temperature: over.temperature.or(self.temperature),
            top_p: over.top_p.or(self.top_p),
            frequency_penalty: over.frequency_penalty.or(self.frequency_penalty),
            presence_penalty: over.presence_penalty.or(self.presence_penalty),
            tool_choice: over.tool_choice.clone().or_else(|| self.tool_choice.clone()),
            parallel_tool_calls: over.parallel_tool_calls.or(self.parallel_tool_calls),
            truncation: over.truncation.or(self.truncation),
            max_tokens: over.max_tokens.or(self.max_tokens),
            metadata: over.metadata.clone().or_else(|| self.metadata.clone()),
            store: over.store.or(self.store),
            include_usage: over.include_usage.or(self.include_usage),
        }
    }

    /// Reject values providers refuse outright.
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(BatonError::invalid_argument(format!(
                    "temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }
        if let Some(p) = self.top_p {
            if !(0.0..=1.0).contains(&p) {
                return Err(BatonError::invalid_argument(format!(
                    "top_p must be within 0.0..=1.0, got {p}"
                )));
            }
        }
        Ok(())
    }
}

/// How the model may pick tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolChoice {
    Auto,
    Required,
    None,
    /// Force a specific tool by name.
    Named(String),
}

impl fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Required => f.write_str("required"),
            Self::None => f.write_str("none"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<String> for ToolChoice {
    fn from(value: String) -> Self {
        match value.as_str() {
            "auto" => Self::Auto,
            "required" => Self::Required,
            "none" => Self::None,
            _ => Self::Named(value),
        }
    }
}

impl From<ToolChoice> for String {
    fn from(value: ToolChoice) -> Self {
        value.to_string()
    }
}

impl FromStr for ToolChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

/// Truncation strategy for over-long inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Truncation {
    Auto,
    Disabled,
}
