//! Declarative listener registration.
//!
//! Instead of subscribing each handler by hand, an object builds its list of
//! [`MarkedListener`]s once, exposes it through [`DispatchListener`], and
//! lets [`DispatchHandle`] subscribe and unsubscribe the whole list.
//!
//! ```rust,ignore
//! struct LayerTree {
//!     listeners: Vec<MarkedListener>,
//! }
//!
//! impl DispatchListener for LayerTree {
//!     fn listeners(&self) -> &[MarkedListener] {
//!         &self.listeners
//!     }
//! }
//!
//! DispatchHandle::setup(&dispatch, &tree);
//! // ...
//! DispatchHandle::tear_down(&dispatch, &tree)?;
//! ```

use super::dispatch::Dispatch;
use super::handler::Handler;
use crate::error::Result;

/// A handler marked for automatic registration on one or more events
///
/// The handler is isolated: errors and panics raised inside it are logged
/// and never reach the emitting caller.
#[derive(Debug, Clone)]
pub struct MarkedListener {
    event_names: Vec<String>,
    handler: Handler,
}

impl MarkedListener {
    /// Event names this listener subscribes to
    pub fn event_names(&self) -> &[String] {
        &self.event_names
    }

    /// The wrapped handler
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// Implemented by objects that own marked listeners
pub trait DispatchListener {
    /// The object's marked listeners
    fn listeners(&self) -> &[MarkedListener];

    /// Label used in setup/tear-down logs
    fn listener_label(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Bulk subscription helpers for objects owning marked listeners
pub struct DispatchHandle;

impl DispatchHandle {
    /// Mark `handler` as a listener for `event_names`
    pub fn register_listener(event_names: &[&str], handler: Handler) -> MarkedListener {
        MarkedListener {
            event_names: event_names.iter().map(|name| name.to_string()).collect(),
            handler: handler.isolated(),
        }
    }

    /// Subscribe every marked listener of `instance`
    pub fn setup<L: DispatchListener + ?Sized>(dispatch: &Dispatch, instance: &L) {
        tracing::info!("Dispatch is now watching: {}", instance.listener_label());
        subscribe_all(dispatch, instance.listeners());
    }

    /// Unsubscribe every marked listener of `instance`
    ///
    /// All listeners are processed; the first failure is returned.
    pub fn tear_down<L: DispatchListener + ?Sized>(
        dispatch: &Dispatch,
        instance: &L,
    ) -> Result<()> {
        tracing::info!("Dispatch has stopped watching: {}", instance.listener_label());
        unsubscribe_all(dispatch, instance.listeners())
    }

    /// Subscribe `instance` and return a guard that tears it down on drop
    pub fn watch<L: DispatchListener + ?Sized>(dispatch: &Dispatch, instance: &L) -> ListenerGuard {
        Self::setup(dispatch, instance);
        ListenerGuard {
            dispatch: dispatch.clone(),
            label: instance.listener_label(),
            listeners: instance.listeners().to_vec(),
        }
    }
}

/// Subscribe each listener to each of its event names
pub fn subscribe_all(dispatch: &Dispatch, listeners: &[MarkedListener]) {
    for listener in listeners {
        for name in &listener.event_names {
            dispatch.register_listener(name, listener.handler.clone());
        }
    }
}

/// Unsubscribe each listener from each of its event names
///
/// Keeps going after a failure and returns the first one.
pub fn unsubscribe_all(dispatch: &Dispatch, listeners: &[MarkedListener]) -> Result<()> {
    let mut first_error = None;
    for listener in listeners {
        for name in &listener.event_names {
            if let Err(e) = dispatch.unregister_listener(name, &listener.handler) {
                tracing::warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Keeps an object's listeners subscribed until dropped
#[must_use = "listeners are unsubscribed as soon as the guard is dropped"]
pub struct ListenerGuard {
    dispatch: Dispatch,
    label: String,
    listeners: Vec<MarkedListener>,
}

impl ListenerGuard {
    /// Number of marked listeners held by the guard
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if the guard holds no listeners
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        tracing::info!("Dispatch has stopped watching: {}", self.label);
        // Failures were already logged by unsubscribe_all.
        let _ = unsubscribe_all(&self.dispatch, &self.listeners);
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("label", &self.label)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::EventArgs;

    struct Panel {
        listeners: Vec<MarkedListener>,
    }

    impl DispatchListener for Panel {
        fn listeners(&self) -> &[MarkedListener] {
            &self.listeners
        }
    }

    fn dispatch() -> Dispatch {
        let dispatch = Dispatch::new();
        dispatch.register_event("on_added_layer", &["layer"]);
        dispatch.register_event("on_updated_layer", &["layer"]);
        dispatch
    }

    #[test]
    fn test_setup_subscribes_every_event_name() {
        let dispatch = dispatch();
        let panel = Panel {
            listeners: vec![DispatchHandle::register_listener(
                &["on_added_layer", "on_updated_layer"],
                Handler::new("refresh", |_| Ok(())),
            )],
        };

        DispatchHandle::setup(&dispatch, &panel);
        assert_eq!(dispatch.listener_count("on_added_layer"), 1);
        assert_eq!(dispatch.listener_count("on_updated_layer"), 1);

        DispatchHandle::tear_down(&dispatch, &panel).unwrap();
        assert_eq!(dispatch.listener_count("on_added_layer"), 0);
        assert_eq!(dispatch.listener_count("on_updated_layer"), 0);
    }

    #[test]
    fn test_tear_down_twice_reports_not_found() {
        let dispatch = dispatch();
        let panel = Panel {
            listeners: vec![DispatchHandle::register_listener(
                &["on_added_layer"],
                Handler::new("refresh", |_| Ok(())),
            )],
        };

        DispatchHandle::setup(&dispatch, &panel);
        DispatchHandle::tear_down(&dispatch, &panel).unwrap();
        assert!(DispatchHandle::tear_down(&dispatch, &panel)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_marked_listener_failure_is_reported() {
        let dispatch = dispatch();
        let panel = Panel {
            listeners: vec![DispatchHandle::register_listener(
                &["on_added_layer"],
                Handler::new("broken", |_| Err(anyhow::anyhow!("no such layer"))),
            )],
        };
        assert!(panel.listeners[0].handler.is_isolated());
        DispatchHandle::setup(&dispatch, &panel);

        let report = dispatch
            .emit("on_added_layer", EventArgs::new().arg(1u32))
            .unwrap();
        assert_eq!(report.delivered, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].handler, "broken");
        assert_eq!(report.failures[0].message, "no such layer");
    }

    #[test]
    fn test_marked_listener_is_contained_under_propagate() {
        let dispatch = Dispatch::with_config(crate::DispatchConfig {
            failure_policy: crate::FailurePolicy::Propagate,
            ..Default::default()
        });
        dispatch.register_event("on_added_layer", &["layer"]);
        let panel = Panel {
            listeners: vec![DispatchHandle::register_listener(
                &["on_added_layer"],
                Handler::new("broken", |_| Err(anyhow::anyhow!("no such layer"))),
            )],
        };
        DispatchHandle::setup(&dispatch, &panel);
        dispatch.register_listener("on_added_layer", Handler::new("after", |_| Ok(())));

        let report = dispatch
            .emit("on_added_layer", EventArgs::new().arg(1u32))
            .unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_guard_unsubscribes_on_drop() {
        let dispatch = dispatch();
        let panel = Panel {
            listeners: vec![DispatchHandle::register_listener(
                &["on_updated_layer"],
                Handler::new("refresh", |_| Ok(())),
            )],
        };

        let guard = DispatchHandle::watch(&dispatch, &panel);
        assert_eq!(guard.len(), 1);
        assert_eq!(dispatch.listener_count("on_updated_layer"), 1);

        drop(guard);
        assert_eq!(dispatch.listener_count("on_updated_layer"), 0);
    }
}
