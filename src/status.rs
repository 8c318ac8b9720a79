//! Status bar listener
//!
//! Mirrors what the viewer's status bar shows: the latest message and how
//! long it should stay visible. Messages are also written to the log.

use mosviz_core::catalog::StatusMessage;
use mosviz_core::{BoundArgs, DispatchHandle, DispatchListener, Event, Handler, MarkedListener};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Latest status bar message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Message text.
    pub message: String,
    /// How long the message stays visible; zero keeps it until replaced.
    pub timeout: Duration,
}

/// Listener that tracks `on_status_message`
pub struct StatusLog {
    current: Mutex<Option<StatusLine>>,
    history: Mutex<Vec<StatusLine>>,
    listeners: Vec<MarkedListener>,
}

impl StatusLog {
    /// Create the listener; subscribe it with [`DispatchHandle::setup`]
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<Self>| Self {
            current: Mutex::new(None),
            history: Mutex::new(Vec::new()),
            listeners: vec![DispatchHandle::register_listener(
                &[StatusMessage::NAME],
                Handler::bound_weak(
                    "StatusLog::on_status_message",
                    this.clone(),
                    Self::on_status_message,
                ),
            )],
        })
    }

    fn on_status_message(&self, args: &BoundArgs) -> anyhow::Result<()> {
        let status = StatusMessage::from_args(args)?;
        tracing::info!(timeout = ?status.timeout, "{}", status.message);

        let line = StatusLine {
            message: status.message,
            timeout: status.timeout,
        };
        self.history.lock().push(line.clone());
        *self.current.lock() = Some(line);
        Ok(())
    }

    /// The message currently shown
    pub fn current(&self) -> Option<StatusLine> {
        self.current.lock().clone()
    }

    /// Every message received, oldest first
    pub fn history(&self) -> Vec<StatusLine> {
        self.history.lock().clone()
    }
}

impl DispatchListener for StatusLog {
    fn listeners(&self) -> &[MarkedListener] {
        &self.listeners
    }
}
