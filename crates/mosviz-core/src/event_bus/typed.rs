//! Typed events.
//!
//! An [`Event`] is a plain struct whose fields are the event's parameters.
//! Publishing one always produces a well-formed emission, and subscribers
//! receive the decoded struct instead of raw arguments.

use super::args::{BoundArgs, EventArgs};
use crate::error::Result;

/// Name and parameter list of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpec {
    /// Event name.
    pub name: &'static str,
    /// Declared parameter names, in order.
    pub params: &'static [&'static str],
}

/// A statically described event
pub trait Event: Sized + Send + Sync + 'static {
    /// Registered event name.
    const NAME: &'static str;
    /// Declared parameter names, in field order.
    const PARAMS: &'static [&'static str];

    /// Name and parameters as an [`EventSpec`]
    fn spec() -> EventSpec {
        EventSpec {
            name: Self::NAME,
            params: Self::PARAMS,
        }
    }

    /// Convert into positional emission arguments
    fn into_args(self) -> EventArgs;

    /// Decode from the arguments of an emission
    fn from_args(args: &BoundArgs) -> Result<Self>;
}

/// Declare typed events and a catalog of their specs
///
/// ```rust,ignore
/// events! {
///     pub const CATALOG;
///
///     /// A file was chosen in the open dialog
///     FileOpen => "on_file_open" { file_name: PathBuf }
/// }
/// ```
#[macro_export]
macro_rules! events {
    (
        $(#[$cmeta:meta])*
        $vis:vis const $catalog:ident;

        $(
            $(#[$meta:meta])*
            $ty:ident => $name:literal { $( $field:ident : $fty:ty ),* $(,)? }
        )*
    ) => {
        $(#[$cmeta])*
        $vis const $catalog: &[$crate::event_bus::EventSpec] = &[
            $( $crate::event_bus::EventSpec {
                name: $name,
                params: &[$( stringify!($field) ),*],
            }, )*
        ];

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            pub struct $ty {
                $(
                    #[allow(missing_docs)]
                    pub $field: $fty,
                )*
            }

            impl $crate::event_bus::Event for $ty {
                const NAME: &'static str = $name;
                const PARAMS: &'static [&'static str] = &[$( stringify!($field) ),*];

                fn into_args(self) -> $crate::event_bus::EventArgs {
                    #[allow(unused_mut)]
                    let mut args = $crate::event_bus::EventArgs::new();
                    $( args = args.arg(self.$field); )*
                    args
                }

                #[allow(unused_variables)]
                fn from_args(
                    args: &$crate::event_bus::BoundArgs,
                ) -> $crate::error::Result<Self> {
                    Ok(Self {
                        $( $field: args.require::<$fty>(stringify!($field))?.clone(), )*
                    })
                }
            }
        )*
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::Dispatch;
    use parking_lot::Mutex;
    use std::sync::Arc;

    crate::events! {
        const TEST_EVENTS;

        Ping => "on_ping" {}
        Moved => "on_moved" { from: u32, to: u32 }
    }

    #[test]
    fn test_macro_generates_specs() {
        assert_eq!(Moved::NAME, "on_moved");
        assert_eq!(Moved::PARAMS, &["from", "to"]);
        assert_eq!(Ping::spec().params.len(), 0);
        assert_eq!(TEST_EVENTS, &[Ping::spec(), Moved::spec()]);
    }

    #[test]
    fn test_publish_subscribe_round_trip() {
        let dispatch = Dispatch::new();
        dispatch.register_specs(TEST_EVENTS);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        dispatch.subscribe::<Moved, _>("track", move |moved| {
            s.lock().push(moved.clone());
            Ok(())
        });

        dispatch.publish(Moved { from: 1, to: 2 }).unwrap();
        assert_eq!(*seen.lock(), vec![Moved { from: 1, to: 2 }]);
    }

    #[test]
    fn test_typed_subscriber_reads_keyword_emission() {
        let dispatch = Dispatch::new();
        dispatch.register::<Moved>();

        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        dispatch.subscribe::<Moved, _>("track", move |moved| {
            *s.lock() = Some(moved.to);
            Ok(())
        });

        dispatch
            .emit("on_moved", EventArgs::new().kwarg("to", 9u32).kwarg("from", 3u32))
            .unwrap();
        assert_eq!(*seen.lock(), Some(9));
    }

    #[test]
    fn test_undecodable_emission_is_reported() {
        let dispatch = Dispatch::new();
        dispatch.register::<Moved>();
        dispatch.subscribe::<Moved, _>("track", |_| Ok(()));

        let report = dispatch
            .emit("on_moved", EventArgs::new().kwarg("to", 9u32))
            .unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("from"));
    }
}
