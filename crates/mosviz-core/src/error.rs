//! Error handling for the MOSViz event bus
//!
//! Provides error types for:
//! - Dispatch errors (event lookup, argument shape, handler removal)
//! - Configuration errors (loading and validating dispatch settings)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Represents errors raised while loading, saving or validating a
/// [`DispatchConfig`](crate::config::DispatchConfig).
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("Config I/O error for {path}: {reason}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// The file contents could not be parsed or serialized.
    #[error("Malformed config: {0}")]
    Malformed(String),

    /// A configuration value is not acceptable.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting {
        /// The offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Dispatch error type
///
/// Represents failures of event emission and listener management.
/// Unknown event names during listener (un)registration and duplicate
/// event registration are not errors: they are logged and ignored.
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    /// No event is registered under this name
    #[error("No such event: {name}")]
    UnknownEvent {
        /// The event name that was looked up.
        name: String,
    },

    /// Emitted arguments do not match the declared parameter list
    #[error(
        "Invalid arguments for '{event}': expected {expected:?}, got {positional} positional and keywords {keywords:?}"
    )]
    InvalidArguments {
        /// The event being emitted.
        event: String,
        /// The declared parameter names.
        expected: Vec<String>,
        /// Number of positional arguments supplied.
        positional: usize,
        /// Keyword names supplied.
        keywords: Vec<String>,
    },

    /// Handler is not subscribed to the event
    #[error("Handler '{handler}' not found on event '{event}'")]
    HandlerNotFound {
        /// The event the removal targeted.
        event: String,
        /// Name of the handler that was not subscribed.
        handler: String,
    },

    /// A declared argument was not supplied to this emission
    #[error("Missing argument '{param}' for event '{event}'")]
    MissingArgument {
        /// The event being handled.
        event: String,
        /// The parameter that had no value.
        param: String,
    },

    /// A supplied argument does not have the requested type
    #[error("Argument '{param}' of event '{event}' is not a {expected}")]
    ArgumentType {
        /// The event being handled.
        event: String,
        /// The parameter that was read.
        param: String,
        /// The requested Rust type.
        expected: &'static str,
    },

    /// A handler failed and the dispatch is configured to propagate failures
    #[error("Handler '{handler}' failed on event '{event}': {message}")]
    HandlerFailed {
        /// The event being emitted.
        event: String,
        /// Name of the failing handler.
        handler: String,
        /// Rendered error chain or panic payload.
        message: String,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DispatchError {
    /// Check if this is a handler-not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchError::HandlerNotFound { .. })
    }

    /// Check if this is an argument-shape error
    pub fn is_invalid_arguments(&self) -> bool {
        matches!(self, DispatchError::InvalidArguments { .. })
    }

    /// Check if this is an unknown-event error
    pub fn is_unknown_event(&self) -> bool {
        matches!(self, DispatchError::UnknownEvent { .. })
    }
}

/// Result type using DispatchError
pub type Result<T> = std::result::Result<T, DispatchError>;
