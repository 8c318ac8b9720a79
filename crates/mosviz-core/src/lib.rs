//! # MOSViz Core
//!
//! The event bus that lets MOSViz widgets talk to each other without
//! knowing about each other, plus the catalog of events they exchange.

pub mod catalog;
pub mod config;
pub mod error;
pub mod event_bus;

pub use config::{ArgumentCheck, DispatchConfig, FailurePolicy};
pub use error::{ConfigError, DispatchError, Result};

pub use event_bus::{
    subscribe_all, unsubscribe_all, ArgValue, BoundArgs, Dispatch, DispatchHandle,
    DispatchListener, EmitReport, Event, EventArgs, EventNode, EventSpec, Handler,
    HandlerFailure, HandlerId, ListenerGuard, MarkedListener,
};

pub use catalog::{catalog_dispatch, register_catalog, EVENT_CATALOG};
