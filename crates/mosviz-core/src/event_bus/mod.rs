//! # Event Bus Module
//!
//! Named publish/subscribe dispatch that decouples MOSViz UI components.
//!
//! ## Overview
//!
//! - Events are registered once by name with a fixed list of parameter names
//! - Listeners subscribe handlers to an event name; duplicates are allowed
//! - Emitting validates the argument shape, then calls every handler in
//!   subscription order on the caller's thread
//! - Handler failures are caught, logged and reported in the [`EmitReport`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mosviz_core::event_bus::{Dispatch, EventArgs, Handler};
//!
//! let dispatch = Dispatch::new();
//! dispatch.register_event("on_removed_data", &["data"]);
//!
//! let record = Handler::new("record", |args| {
//!     println!("removed {}", args.require::<String>("data")?);
//!     Ok(())
//! });
//! dispatch.register_listener("on_removed_data", record.clone());
//!
//! dispatch
//!     .event("on_removed_data")
//!     .expect("registered above")
//!     .emit(EventArgs::new().kwarg("data", "x".to_string()))?;
//!
//! dispatch.unregister_listener("on_removed_data", &record)?;
//! ```

mod args;
mod dispatch;
mod handle;
mod handler;
mod node;
mod typed;

pub use args::{ArgValue, BoundArgs, EventArgs};
pub use dispatch::Dispatch;
pub use handle::{
    subscribe_all, unsubscribe_all, DispatchHandle, DispatchListener, ListenerGuard,
    MarkedListener,
};
pub use handler::{Handler, HandlerFailure, HandlerFn, HandlerId};
pub use node::{EmitReport, EventNode};
pub use typed::{Event, EventSpec};
