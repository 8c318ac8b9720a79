//! Dispatch configuration
//!
//! Controls how the event bus validates emitted arguments and how it reacts
//! to failing handlers. Supports JSON and TOML files.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What `emit` does when a handler returns an error or panics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, record it in the emit report and keep delivering
    #[default]
    Isolate,
    /// Stop at the first failure and return it to the emitting caller
    Propagate,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Isolate => write!(f, "isolate"),
            Self::Propagate => write!(f, "propagate"),
        }
    }
}

/// Argument-shape rule applied before any handler runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentCheck {
    /// Positional count equals the parameter count, or every keyword is a
    /// declared parameter.
    #[default]
    Lenient,
    /// Positional arguments fill the leading parameters in order and the
    /// keywords name each remaining parameter exactly once.
    Strict,
}

impl std::fmt::Display for ArgumentCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Event bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Reaction to failing handlers.
    pub failure_policy: FailurePolicy,
    /// Catch panics raised inside handlers.
    pub catch_panics: bool,
    /// Argument-shape rule for emission.
    pub argument_check: ArgumentCheck,
    /// Trace every handler invocation.
    pub log_emissions: bool,
    /// Warn when an event name is registered twice.
    pub warn_on_duplicate_event: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Isolate,
            catch_panics: true,
            argument_check: ArgumentCheck::Lenient,
            log_emissions: false,
            warn_on_duplicate_event: true,
        }
    }
}

impl DispatchConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match Self::format_of(path)? {
            Format::Json => serde_json::from_str(&content)
                .map_err(|e| ConfigError::Malformed(format!("Invalid JSON config: {}", e)))?,
            Format::Toml => toml::from_str(&content)
                .map_err(|e| ConfigError::Malformed(format!("Invalid TOML config: {}", e)))?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let content = match Self::format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::Malformed(format!("Failed to serialize config: {}", e)))?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| ConfigError::Malformed(format!("Failed to serialize config: {}", e)))?,
        };

        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Validate configuration
    ///
    /// Propagating failures requires panics to be caught, otherwise a
    /// panicking handler would unwind through the emitting caller instead
    /// of surfacing as `HandlerFailed`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_policy == FailurePolicy::Propagate && !self.catch_panics {
            return Err(ConfigError::InvalidSetting {
                key: "catch_panics".to_string(),
                reason: "must be true when failure_policy is propagate".to_string(),
            });
        }
        Ok(())
    }

    fn format_of(path: &Path) -> Result<Format, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

enum Format {
    Json,
    Toml,
}
