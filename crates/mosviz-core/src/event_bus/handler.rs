//! Event handlers with stable identity.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use uuid::Uuid;

use super::args::BoundArgs;

/// Identity shared by a handler and all of its clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handler({})", &self.0.to_string()[..8])
    }
}

/// Type alias for handler functions
pub type HandlerFn = dyn Fn(&BoundArgs) -> anyhow::Result<()> + Send + Sync;

/// A subscribable callable
///
/// Cloning keeps the identity, so a clone can be used to unsubscribe the
/// original. Two handlers built from the same closure are distinct.
#[derive(Clone)]
pub struct Handler {
    id: HandlerId,
    name: Arc<str>,
    func: Arc<HandlerFn>,
    isolated: bool,
}

impl Handler {
    /// Wrap a function as a handler
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&BoundArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            id: HandlerId::new(),
            name: Arc::from(name.into()),
            func: Arc::new(func),
            isolated: false,
        }
    }

    /// Bind a method to its owning instance
    ///
    /// The handler keeps only a weak reference; once the owner is dropped the
    /// handler does nothing.
    pub fn bound<T>(
        name: impl Into<String>,
        instance: &Arc<T>,
        method: fn(&T, &BoundArgs) -> anyhow::Result<()>,
    ) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::bound_weak(name, Arc::downgrade(instance), method)
    }

    /// Like [`Handler::bound`], for owners still under construction
    /// (see `Arc::new_cyclic`).
    pub fn bound_weak<T>(
        name: impl Into<String>,
        instance: Weak<T>,
        method: fn(&T, &BoundArgs) -> anyhow::Result<()>,
    ) -> Self
    where
        T: Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        Self::new(name, move |args| match instance.upgrade() {
            Some(owner) => method(&owner, args),
            None => {
                tracing::trace!("Owner of '{}' dropped, skipping {}", label, args.event());
                Ok(())
            }
        })
    }

    /// Identity of this handler
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Human-readable name used in logs and errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the handler, letting errors and panics through
    pub fn call(&self, args: &BoundArgs) -> anyhow::Result<()> {
        (self.func)(args)
    }

    /// Call the handler and turn an error, or a caught panic, into a
    /// [`HandlerFailure`]
    pub fn invoke(&self, args: &BoundArgs, catch_panics: bool) -> Result<(), HandlerFailure> {
        let outcome = if catch_panics || self.isolated {
            match panic::catch_unwind(AssertUnwindSafe(|| self.call(args))) {
                Ok(result) => result,
                Err(payload) => {
                    return Err(self.failure(panic_message(payload.as_ref()), None, true));
                }
            }
        } else {
            self.call(args)
        };

        outcome.map_err(|e| self.failure(format!("{:#}", e), Some(format!("{:?}", e)), false))
    }

    /// Mark this handler as isolated
    ///
    /// Failures of an isolated handler are always logged and recorded in the
    /// emit report, and never stop the emission, whatever the dispatch's
    /// failure policy. Panics are caught even when `catch_panics` is off.
    /// The returned handler keeps the same identity and name.
    pub fn isolated(mut self) -> Self {
        self.isolated = true;
        self
    }

    /// Whether failures of this handler are always contained
    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    fn failure(&self, message: String, trace: Option<String>, panicked: bool) -> HandlerFailure {
        HandlerFailure {
            handler: self.name.to_string(),
            handler_id: self.id,
            message,
            trace,
            panicked,
        }
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Handler {}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("isolated", &self.isolated)
            .finish()
    }
}

/// A handler failure caught during emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Name of the failing handler.
    pub handler: String,
    /// Identity of the failing handler.
    pub handler_id: HandlerId,
    /// Error chain on one line, or the panic message.
    pub message: String,
    /// Multi-line error report (chain and backtrace when captured).
    pub trace: Option<String>,
    /// Whether the handler panicked rather than returning an error.
    pub panicked: bool,
}

impl HandlerFailure {
    /// The most detailed rendering available
    pub fn trace(&self) -> &str {
        self.trace.as_deref().unwrap_or(&self.message)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked with a non-string payload".to_string()
    }
}
