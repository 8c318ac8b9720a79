//! # MOSViz Event Catalog
//!
//! The fixed set of events exchanged by the viewer's widgets, as typed
//! structs plus the [`EVENT_CATALOG`] used to register them all at once.

mod events;
mod types;

pub use events::*;
pub use types::*;

use crate::config::DispatchConfig;
use crate::event_bus::Dispatch;

/// Register every catalog event on `dispatch`
///
/// Returns the number of events that were newly registered.
pub fn register_catalog(dispatch: &Dispatch) -> usize {
    dispatch.register_specs(EVENT_CATALOG)
}

/// Create a dispatch with the whole catalog registered
pub fn catalog_dispatch(config: DispatchConfig) -> Dispatch {
    Dispatch::with_catalog(config, EVENT_CATALOG)
}
