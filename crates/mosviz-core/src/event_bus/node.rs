//! A single named event and its subscribers.

use parking_lot::RwLock;
use std::sync::Arc;

use super::args::{BoundArgs, EventArgs};
use super::handler::{Handler, HandlerFailure};
use crate::config::{ArgumentCheck, DispatchConfig, FailurePolicy};
use crate::error::{DispatchError, Result};

/// Outcome of one emission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Handlers that returned successfully.
    pub delivered: usize,
    /// Handlers that failed, in call order.
    pub failures: Vec<HandlerFailure>,
}

impl EmitReport {
    /// Total number of handlers that were called
    pub fn invoked(&self) -> usize {
        self.delivered + self.failures.len()
    }

    /// True when no handler failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One named event: declared parameters plus ordered handlers
///
/// Handlers run in subscription order. The same handler may be subscribed
/// more than once and then runs once per subscription.
pub struct EventNode {
    name: Arc<str>,
    params: Arc<[String]>,
    handlers: RwLock<Vec<Handler>>,
    config: DispatchConfig,
}

impl EventNode {
    /// Create an event accepting the given parameter names
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(name, params, DispatchConfig::default())
    }

    /// Create an event with explicit emission settings
    pub fn with_config<I, S>(name: impl Into<String>, params: I, config: DispatchConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Arc::from(name.into()),
            params: params.into_iter().map(Into::<String>::into).collect(),
            handlers: RwLock::new(Vec::new()),
            config,
        }
    }

    /// Event name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter names, in order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Append a handler
    pub fn add_handler(&self, handler: Handler) {
        tracing::debug!("{} '{}' subscribed to {}", handler.id(), handler.name(), self.name);
        self.handlers.write().push(handler);
    }

    /// Remove the first subscription of `handler`
    pub fn remove_handler(&self, handler: &Handler) -> Result<()> {
        let mut handlers = self.handlers.write();
        match handlers.iter().position(|h| h == handler) {
            Some(index) => {
                handlers.remove(index);
                tracing::debug!(
                    "{} '{}' unsubscribed from {}",
                    handler.id(),
                    handler.name(),
                    self.name
                );
                Ok(())
            }
            None => Err(DispatchError::HandlerNotFound {
                event: self.name.to_string(),
                handler: handler.name().to_string(),
            }),
        }
    }

    /// Whether `handler` is subscribed at least once
    pub fn is_subscribed(&self, handler: &Handler) -> bool {
        self.handlers.read().iter().any(|h| h == handler)
    }

    /// Number of subscriptions
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Remove all handlers
    pub fn clear(&self) {
        self.handlers.write().clear();
    }

    /// Check the argument shape against the declared parameters
    pub fn check_arguments(&self, args: &EventArgs) -> Result<()> {
        let ok = match self.config.argument_check {
            ArgumentCheck::Lenient => {
                args.positional_len() == self.params.len()
                    || args.keyword_names().all(|k| self.declares(k))
            }
            ArgumentCheck::Strict => self.covers_exactly(args),
        };

        if ok {
            Ok(())
        } else {
            Err(DispatchError::InvalidArguments {
                event: self.name.to_string(),
                expected: self.params.to_vec(),
                positional: args.positional_len(),
                keywords: args.keyword_names().map(str::to_string).collect(),
            })
        }
    }

    /// Validate `args` and call every handler in subscription order
    ///
    /// Handlers run against a snapshot of the subscriber list, so changes
    /// made by a handler apply from the next emission on.
    pub fn emit(&self, args: EventArgs) -> Result<EmitReport> {
        self.check_arguments(&args)?;

        let handlers = self.handlers.read().clone();
        let bound = BoundArgs::new(self.name.clone(), self.params.clone(), args);
        let mut report = EmitReport::default();

        for handler in &handlers {
            if self.config.log_emissions {
                tracing::trace!("Sending {} to '{}'", self.name, handler.name());
            }

            let failure = match handler.invoke(&bound, self.config.catch_panics) {
                Ok(()) => {
                    report.delivered += 1;
                    continue;
                }
                Err(failure) => failure,
            };

            // Isolated handlers never stop an emission.
            if self.config.failure_policy == FailurePolicy::Propagate && !handler.is_isolated() {
                return Err(DispatchError::HandlerFailed {
                    event: self.name.to_string(),
                    handler: failure.handler,
                    message: failure.message,
                });
            }

            tracing::error!(
                event = %self.name,
                "Exception in '{}':\n{}",
                failure.handler,
                failure.trace()
            );
            report.failures.push(failure);
        }

        Ok(report)
    }

    fn declares(&self, param: &str) -> bool {
        self.params.iter().any(|p| p == param)
    }

    fn covers_exactly(&self, args: &EventArgs) -> bool {
        let positional = args.positional_len();
        if positional > self.params.len() {
            return false;
        }
        let rest = &self.params[positional..];
        let keywords: Vec<&str> = args.keyword_names().collect();
        keywords.len() == rest.len() && keywords.iter().all(|k| rest.iter().any(|p| p == *k))
    }
}

impl std::fmt::Debug for EventNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventNode")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Handler {
        let log = log.clone();
        let label = name.to_string();
        Handler::new(name, move |_| {
            log.lock().push(label.clone());
            Ok(())
        })
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let node = EventNode::new("on_updated_layer", ["layer"]);
        let log = Arc::new(Mutex::new(Vec::new()));
        for name in ["h1", "h2", "h3", "h4"] {
            node.add_handler(recorder(name, &log));
        }

        let report = node.emit(EventArgs::new().arg(1u32)).unwrap();
        assert_eq!(report.delivered, 4);
        assert_eq!(*log.lock(), vec!["h1", "h2", "h3", "h4"]);
    }

    #[test]
    fn test_duplicate_subscription_runs_twice() {
        let node = EventNode::new("on_erase_linelabels", Vec::<String>::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler = recorder("twice", &log);
        node.add_handler(handler.clone());
        node.add_handler(handler.clone());

        node.emit(EventArgs::new()).unwrap();
        assert_eq!(log.lock().len(), 2);

        node.remove_handler(&handler).unwrap();
        assert_eq!(node.handler_count(), 1);
        assert!(node.is_subscribed(&handler));
    }

    #[test]
    fn test_positional_count_match_ignores_keywords() {
        let node = EventNode::new("on_status_message", ["message", "timeout"]);
        let args = EventArgs::new()
            .arg("ready")
            .arg(0u64)
            .kwarg("unexpected", true);
        assert!(node.emit(args).is_ok());
    }

    #[test]
    fn test_unknown_keyword_fails_without_calling_handlers() {
        let node = EventNode::new("on_removed_data", ["data"]);
        let log = Arc::new(Mutex::new(Vec::new()));
        node.add_handler(recorder("never", &log));

        let err = node
            .emit(EventArgs::new().kwarg("dataset", "x"))
            .unwrap_err();
        assert!(err.is_invalid_arguments());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_strict_check_requires_every_parameter() {
        let config = DispatchConfig {
            argument_check: ArgumentCheck::Strict,
            ..Default::default()
        };
        let node = EventNode::with_config("on_file_read", ["file_name", "file_filter"], config);

        assert!(node.emit(EventArgs::new()).is_err());
        assert!(node.emit(EventArgs::new().kwarg("file_name", "a.fits")).is_err());
        assert!(node
            .emit(EventArgs::new().arg("a.fits").kwarg("file_filter", "FITS"))
            .is_ok());
        assert!(node
            .emit(
                EventArgs::new()
                    .kwarg("file_filter", "FITS")
                    .kwarg("file_name", "a.fits")
            )
            .is_ok());
        assert!(node
            .emit(EventArgs::new().arg("a.fits").kwarg("file_name", "b.fits"))
            .is_err());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let node = EventNode::new("on_add_roi", Vec::<String>::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        node.add_handler(recorder("h", &log));

        node.clear();
        node.clear();
        let report = node.emit(EventArgs::new()).unwrap();
        assert_eq!(report.invoked(), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_remove_missing_handler_fails_each_time() {
        let node = EventNode::new("on_added_data", ["data"]);
        let stranger = Handler::new("stranger", |_| Ok(()));
        assert!(node.remove_handler(&stranger).unwrap_err().is_not_found());
        assert!(node.remove_handler(&stranger).unwrap_err().is_not_found());
    }

    #[test]
    fn test_isolate_policy_continues_after_failure() {
        let node = EventNode::new("on_updated_model", ["model"]);
        let log = Arc::new(Mutex::new(Vec::new()));
        node.add_handler(Handler::new("broken", |_| Err(anyhow::anyhow!("fit diverged"))));
        node.add_handler(recorder("after", &log));

        let report = node.emit(EventArgs::new().arg(7u32)).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].handler, "broken");
        assert_eq!(*log.lock(), vec!["after"]);
    }

    #[test]
    fn test_propagate_policy_stops_at_first_failure() {
        let config = DispatchConfig {
            failure_policy: FailurePolicy::Propagate,
            ..Default::default()
        };
        let node = EventNode::with_config("on_updated_model", ["model"], config);
        let log = Arc::new(Mutex::new(Vec::new()));
        node.add_handler(Handler::new("broken", |_| panic!("fit diverged")));
        node.add_handler(recorder("after", &log));

        let err = node.emit(EventArgs::new().arg(7u32)).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::HandlerFailed { ref handler, .. } if handler == "broken"
        ));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_isolated_handler_is_reported_under_propagate() {
        let config = DispatchConfig {
            failure_policy: FailurePolicy::Propagate,
            ..Default::default()
        };
        let node = EventNode::with_config("on_updated_model", ["model"], config);
        let log = Arc::new(Mutex::new(Vec::new()));
        let broken = Handler::new("broken", |_| Err(anyhow::anyhow!("fit diverged"))).isolated();
        node.add_handler(broken.clone());
        node.add_handler(recorder("after", &log));

        let report = node.emit(EventArgs::new().arg(7u32)).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].handler_id, broken.id());
        assert_eq!(report.failures[0].message, "fit diverged");
        assert_eq!(*log.lock(), vec!["after"]);
    }

    #[test]
    fn test_isolated_panic_is_caught_with_catch_panics_off() {
        let config = DispatchConfig {
            catch_panics: false,
            ..Default::default()
        };
        let node = EventNode::with_config("on_add_roi", Vec::<String>::new(), config);
        let log = Arc::new(Mutex::new(Vec::new()));
        node.add_handler(Handler::new("panicky", |_| panic!("bad roi")).isolated());
        node.add_handler(recorder("after", &log));

        let report = node.emit(EventArgs::new()).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].panicked);
        assert_eq!(*log.lock(), vec!["after"]);
    }

    #[test]
    fn test_logged_emission_still_delivers() {
        let config = DispatchConfig {
            log_emissions: true,
            ..Default::default()
        };
        let node = EventNode::with_config("on_selected_window", ["window"], config);
        let log = Arc::new(Mutex::new(Vec::new()));
        node.add_handler(recorder("h1", &log));
        node.add_handler(recorder("h2", &log));

        let report = node.emit(EventArgs::new().arg(3u32)).unwrap();
        assert_eq!(report.delivered, 2);
        assert_eq!(*log.lock(), vec!["h1", "h2"]);
    }

    #[test]
    fn test_handler_subscribing_during_emit_applies_next_time() {
        let node = Arc::new(EventNode::new("on_add_roi", Vec::<String>::new()));
        let log = Arc::new(Mutex::new(Vec::new()));

        let late = recorder("late", &log);
        let weak = Arc::downgrade(&node);
        node.add_handler(Handler::new("subscriber", move |_| {
            if let Some(node) = weak.upgrade() {
                node.add_handler(late.clone());
            }
            Ok(())
        }));

        let first = node.emit(EventArgs::new()).unwrap();
        assert_eq!(first.invoked(), 1);
        assert!(log.lock().is_empty());

        let second = node.emit(EventArgs::new()).unwrap();
        assert_eq!(second.invoked(), 2);
        assert_eq!(*log.lock(), vec!["late"]);
    }
}
