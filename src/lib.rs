//! # MOSViz
//!
//! Event dispatch for the MOSViz multi-object spectroscopy viewer.
//!
//! ## Architecture
//!
//! The workspace is organized as:
//!
//! 1. **mosviz-core** - Event bus, typed events, configuration and the event catalog
//! 2. **mosviz** - Logging setup, status-bar listener and the catalog inspector binary
//!
//! ## Features
//!
//! - **Named Events**: register once with a fixed parameter list, emit by name
//! - **Ordered Fan-out**: handlers run synchronously in subscription order
//! - **Failure Isolation**: failing handlers are logged and reported, never fatal
//! - **Declarative Listeners**: objects subscribe and unsubscribe their listeners in bulk
//! - **Typed Catalog**: every MOSViz event as a struct with checked fields

pub mod status;

pub use mosviz_core::{catalog, config, error, event_bus};

pub use mosviz_core::{
    catalog_dispatch, register_catalog, ArgumentCheck, BoundArgs, ConfigError, Dispatch,
    DispatchConfig, DispatchError, DispatchHandle, DispatchListener, EmitReport, Event,
    EventArgs, EventNode, EventSpec, FailurePolicy, Handler, HandlerFailure, ListenerGuard,
    MarkedListener, Result, EVENT_CATALOG,
};

pub use status::StatusLog;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Read the format from `MOSVIZ_LOG_FORMAT` (`json` or `pretty`)
    pub fn from_env() -> Self {
        match std::env::var("MOSVIZ_LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Build the log filter from `RUST_LOG`-style directives
///
/// Directives that fail to parse are ignored; with none left, INFO applies.
pub fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Console output, pretty or JSON
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let env_filter = log_filter(&directives);

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
