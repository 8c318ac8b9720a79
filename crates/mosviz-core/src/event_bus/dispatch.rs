//! Event registry.
//!
//! Provides the [`Dispatch`] handle shared by every component that publishes
//! or subscribes.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::args::{BoundArgs, EventArgs};
use super::handler::Handler;
use super::node::{EmitReport, EventNode};
use super::typed::{Event, EventSpec};
use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};

#[derive(Default)]
struct EventTable {
    nodes: HashMap<String, Arc<EventNode>>,
    order: Vec<String>,
}

/// Central communications object for all events
///
/// Cloning is cheap and every clone refers to the same registry.
#[derive(Clone)]
pub struct Dispatch {
    events: Arc<RwLock<EventTable>>,
    config: Arc<DispatchConfig>,
}

impl Dispatch {
    /// Create an empty dispatch with default configuration
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Create an empty dispatch with custom configuration
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            events: Arc::new(RwLock::new(EventTable::default())),
            config: Arc::new(config),
        }
    }

    /// Create a dispatch and register every event of `catalog`
    pub fn with_catalog(config: DispatchConfig, catalog: &[EventSpec]) -> Self {
        let dispatch = Self::with_config(config);
        dispatch.register_specs(catalog);
        dispatch
    }

    /// Get the current configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Register a new event name with its parameter names
    ///
    /// Returns false and logs a warning if the name is already taken; the
    /// existing event and its handlers are left untouched.
    pub fn register_event(&self, name: &str, params: &[&str]) -> bool {
        let mut table = self.events.write();
        if table.nodes.contains_key(name) {
            if self.config.warn_on_duplicate_event {
                tracing::warn!(
                    "Event '{}' already exists. Please use a different name.",
                    name
                );
            }
            return false;
        }

        let node = EventNode::with_config(name, params.iter().copied(), (*self.config).clone());
        table.nodes.insert(name.to_string(), Arc::new(node));
        table.order.push(name.to_string());
        tracing::debug!("Registered event {}({})", name, params.join(", "));
        true
    }

    /// Register every event of a catalog
    ///
    /// Returns the number of events that were newly created.
    pub fn register_specs(&self, specs: &[EventSpec]) -> usize {
        specs
            .iter()
            .filter(|spec| self.register_event(spec.name, spec.params))
            .count()
    }

    /// Append `handler` to the named event
    ///
    /// Returns false and logs a warning if the event does not exist.
    pub fn register_listener(&self, name: &str, handler: Handler) -> bool {
        match self.event(name) {
            Some(node) => {
                node.add_handler(handler);
                true
            }
            None => {
                tracing::warn!(
                    "No such event: {}. Event must be registered before listeners can be assigned.",
                    name
                );
                false
            }
        }
    }

    /// Remove `handler` from the named event
    ///
    /// An unknown event logs a warning and succeeds. A handler that is not
    /// subscribed fails with [`DispatchError::HandlerNotFound`].
    pub fn unregister_listener(&self, name: &str, handler: &Handler) -> Result<()> {
        match self.event(name) {
            Some(node) => node.remove_handler(handler),
            None => {
                tracing::warn!("No such event: {}.", name);
                Ok(())
            }
        }
    }

    /// The event registered under `name`
    pub fn event(&self, name: &str) -> Option<Arc<EventNode>> {
        self.events.read().nodes.get(name).cloned()
    }

    /// The event registered under `name`, or [`DispatchError::UnknownEvent`]
    pub fn require_event(&self, name: &str) -> Result<Arc<EventNode>> {
        self.event(name).ok_or_else(|| DispatchError::UnknownEvent {
            name: name.to_string(),
        })
    }

    /// Emit the named event
    pub fn emit(&self, name: &str, args: EventArgs) -> Result<EmitReport> {
        self.require_event(name)?.emit(args)
    }

    /// Whether an event is registered under `name`
    pub fn has_event(&self, name: &str) -> bool {
        self.events.read().nodes.contains_key(name)
    }

    /// Registered event names in registration order
    pub fn event_names(&self) -> Vec<String> {
        self.events.read().order.clone()
    }

    /// Number of registered events
    pub fn event_count(&self) -> usize {
        self.events.read().order.len()
    }

    /// Number of subscriptions on the named event (0 if unknown)
    pub fn listener_count(&self, name: &str) -> usize {
        self.event(name).map_or(0, |node| node.handler_count())
    }

    /// Register the typed event `E`
    pub fn register<E: Event>(&self) -> bool {
        self.register_event(E::NAME, E::PARAMS)
    }

    /// Emit a typed event
    pub fn publish<E: Event>(&self, event: E) -> Result<EmitReport> {
        self.emit(E::NAME, event.into_args())
    }

    /// Subscribe a typed handler to `E`
    ///
    /// The returned handler can be passed to
    /// [`unregister_listener`](Self::unregister_listener). If `E` is not
    /// registered a warning is logged and the handler stays detached.
    pub fn subscribe<E, F>(&self, name: impl Into<String>, func: F) -> Handler
    where
        E: Event,
        F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let handler = Handler::new(name, move |args: &BoundArgs| {
            let event = E::from_args(args)?;
            func(&event)
        });
        self.register_listener(E::NAME, handler.clone());
        handler
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("events", &self.event_count())
            .field("config", &self.config)
            .finish()
    }
}
