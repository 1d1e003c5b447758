//! Explorer configuration.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`HORREUM_EXPLORER_*`, sections split by `__`,
//!    e.g. `HORREUM_EXPLORER_SUGGESTION__DEBOUNCE_MS=250`)
//! 2. Configuration file (`horreum-explorer.toml`)
//! 3. Default values

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use horreum_json_path::Suggestions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::mode::{Dialect, QueryMode};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// Suggestion configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Idle time between the last keystroke and suggestion recomputation.
    pub debounce_ms: u64,
    /// Inputs shorter than this (after trimming) get no suggestions.
    pub min_input_len: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            min_input_len: 0,
        }
    }
}

impl SuggestionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn should_suggest(&self, input: &str) -> bool {
        input.trim().chars().count() >= self.min_input_len
    }

    /// [`suggest`](horreum_json_path::suggest) for inputs of at least
    /// `min_input_len` characters. Shorter inputs get no candidates and no
    /// validity hint.
    pub fn suggest(&self, doc: Option<&Value>, input: &str) -> Suggestions {
        if !self.should_suggest(input) {
            tracing::trace!(input, min_input_len = self.min_input_len, "input too short to suggest");
            return Suggestions::default();
        }
        horreum_json_path::suggest(doc, input)
    }
}

/// Query configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Mode used when the URL carries no `type`.
    pub default_mode: QueryMode,
    /// Dialect of locally evaluated queries.
    pub default_dialect: Dialect,
}

/// Main explorer configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub suggestion: SuggestionConfig,
    pub query: QueryConfig,
}

impl ExplorerConfig {
    /// Loads configuration from default sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("horreum-explorer.toml")
    }

    /// Loads configuration from a specific file path. A missing file is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("HORREUM_EXPLORER_").split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded explorer configuration");
        Ok(config)
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=60_000).contains(&self.suggestion.debounce_ms) {
            return Err(ConfigError::InvalidValue {
                key: "suggestion.debounce_ms".to_string(),
                message: format!(
                    "value {} is out of range [1, 60000]",
                    self.suggestion.debounce_ms
                ),
            });
        }

        if self.suggestion.min_input_len > 256 {
            return Err(ConfigError::InvalidValue {
                key: "suggestion.min_input_len".to_string(),
                message: format!(
                    "value {} is out of range [0, 256]",
                    self.suggestion.min_input_len
                ),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
