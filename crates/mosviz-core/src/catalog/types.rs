//! Values carried by catalog events.
//!
//! UI objects are referenced by identifier rather than passed around, so
//! every event payload is `Send + Sync` and cheap to clone.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

macro_rules! id_type {
    ($($(#[$meta:meta])* $name:ident => $label:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
            pub struct $name(Uuid);

            impl $name {
                /// Create a new unique identifier
                pub fn new() -> Self {
                    Self(Uuid::new_v4())
                }

                /// The underlying UUID
                pub fn as_uuid(&self) -> Uuid {
                    self.0
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}({})", $label, &self.0.to_string()[..8])
                }
            }
        )*
    };
}

id_type! {
    /// A loaded spectrum data set
    DataId => "Data";
    /// A layer drawn from a data set
    LayerId => "Layer";
    /// A plot sub-window
    WindowId => "Window";
    /// A plot inside a window
    PlotId => "Plot";
    /// A fitted model attached to a layer
    ModelId => "Model";
    /// A row in the layer tree widget
    LayerItemId => "LayerItem";
    /// A row in the model tree widget
    ModelItemId => "ModelItem";
    /// A line list table view
    TableViewId => "TableView";
}

/// Spectral bounds of a region of interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiBounds {
    /// Lower dispersion bound.
    pub lower: f64,
    /// Upper dispersion bound.
    pub upper: f64,
}

impl RoiBounds {
    /// Create bounds, ordering the two values
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// Width of the region
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `x` lies inside the region (inclusive)
    pub fn contains(&self, x: f64) -> bool {
        (self.lower..=self.upper).contains(&x)
    }
}

/// Named statistics computed over the current regions of interest
pub type Stats = BTreeMap<String, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(LayerId::new(), LayerId::new());
    }

    #[test]
    fn test_id_display() {
        let id = WindowId::new();
        let text = id.to_string();
        assert!(text.starts_with("Window("));
        assert_eq!(text.len(), "Window(".len() + 8 + 1);
    }

    #[test]
    fn test_roi_bounds_are_ordered() {
        let roi = RoiBounds::new(6563.0, 4861.0);
        assert_eq!(roi.lower, 4861.0);
        assert_eq!(roi.width(), 1702.0);
        assert!(roi.contains(5000.0));
        assert!(!roi.contains(7000.0));
    }

    #[test]
    fn test_ids_serialize_as_uuid_strings() {
        let id = DataId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}
