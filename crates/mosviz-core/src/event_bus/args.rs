//! Emission arguments.
//!
//! Values travel type-erased and are read back by declared parameter name.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DispatchError, Result};

/// A single type-erased argument value
pub type ArgValue = Arc<dyn Any + Send + Sync>;

/// Positional and keyword arguments supplied to `emit`
#[derive(Clone, Default)]
pub struct EventArgs {
    positional: Vec<ArgValue>,
    keyword: Vec<(String, ArgValue)>,
}

impl EventArgs {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.positional.push(Arc::new(value));
        self
    }

    /// Set a keyword argument, replacing an earlier value for the same name
    pub fn kwarg<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        let name = name.into();
        let value: ArgValue = Arc::new(value);
        match self.keyword.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.keyword.push((name, value)),
        }
        self
    }

    /// Number of positional arguments
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    /// Keyword names in the order they were first set
    pub fn keyword_names(&self) -> impl Iterator<Item = &str> {
        self.keyword.iter().map(|(k, _)| k.as_str())
    }

    /// True when no argument was supplied at all
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Positional argument at `index`
    pub fn positional(&self, index: usize) -> Option<&ArgValue> {
        self.positional.get(index)
    }

    /// Keyword argument named `name`
    pub fn keyword(&self, name: &str) -> Option<&ArgValue> {
        self.keyword
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

impl std::fmt::Debug for EventArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventArgs")
            .field("positional", &self.positional.len())
            .field("keywords", &self.keyword_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Arguments of one emission bound to the event's parameter list
///
/// Lookup by parameter name checks keywords first, then the positional slot
/// at the parameter's declared index.
#[derive(Clone, Debug)]
pub struct BoundArgs {
    event: Arc<str>,
    params: Arc<[String]>,
    args: EventArgs,
}

impl BoundArgs {
    pub(crate) fn new(event: Arc<str>, params: Arc<[String]>, args: EventArgs) -> Self {
        Self {
            event,
            params,
            args,
        }
    }

    /// Name of the event being delivered
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Declared parameter names of the event
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The arguments exactly as they were emitted
    pub fn raw(&self) -> &EventArgs {
        &self.args
    }

    /// Untyped value of `param`
    pub fn value(&self, param: &str) -> Option<&ArgValue> {
        if let Some(value) = self.args.keyword(param) {
            return Some(value);
        }
        let index = self.params.iter().position(|p| p == param)?;
        self.args.positional(index)
    }

    /// Value of `param` if present and of type `T`
    pub fn get<T: Any>(&self, param: &str) -> Option<&T> {
        self.value(param)
            .and_then(|value| (**value).downcast_ref::<T>())
    }

    /// Value of `param`, failing when it is absent or of another type
    pub fn require<T: Any>(&self, param: &str) -> Result<&T> {
        let value = self
            .value(param)
            .ok_or_else(|| DispatchError::MissingArgument {
                event: self.event.to_string(),
                param: param.to_string(),
            })?;
        (**value)
            .downcast_ref::<T>()
            .ok_or_else(|| DispatchError::ArgumentType {
                event: self.event.to_string(),
                param: param.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }
}
