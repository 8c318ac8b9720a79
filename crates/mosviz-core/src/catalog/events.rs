//! Event definitions consumed by the MOSViz widgets.
//!
//! Names and parameter lists are a contract with the UI code and must not
//! change.

use std::path::PathBuf;
use std::time::Duration;

use super::types::{
    DataId, LayerId, LayerItemId, ModelId, ModelItemId, PlotId, RoiBounds, Stats, TableViewId,
    WindowId,
};

crate::events! {
    /// Every MOSViz event, in registration order
    pub const EVENT_CATALOG;

    /// A plot sub-window became the active one
    ActivatedWindow => "on_activated_window" { window: WindowId }

    /// A data set finished loading
    AddedData => "on_added_data" { data: DataId }
    /// A window was created for a layer
    AddedWindow => "on_added_window" { layer: LayerId, window: WindowId }
    /// A plot was added to a window
    AddedPlot => "on_added_plot" { plot: PlotId, window: WindowId }
    /// A layer was created
    AddedLayer => "on_added_layer" { layer: LayerId }
    /// A layer was placed into a window
    AddedToWindow => "on_added_to_window" { layer: LayerId, window: WindowId }

    /// The line list window was requested
    ShowLinelistsWindow => "on_show_linelists_window" {}
    /// The line list window was closed
    DismissLinelistsWindow => "on_dismiss_linelists_window" {}
    /// Line lists should be (re)loaded
    RequestLinelists => "on_request_linelists" {}
    /// Line lists should be drawn from these tables
    PlotLinelists => "on_plot_linelists" { table_views: Vec<TableViewId> }
    /// Line labels should be removed from the plot
    EraseLinelabels => "on_erase_linelabels" {}

    /// A data set was removed
    RemovedData => "on_removed_data" { data: DataId }
    /// A plot was removed from a window
    RemovedPlot => "on_removed_plot" { layer: LayerId, window: WindowId }
    /// A layer was removed
    RemovedLayer => "on_removed_layer" { layer: LayerId, window: WindowId }
    /// A model was detached from a layer
    RemovedModel => "on_removed_model" { model: ModelId, layer: LayerId }
    /// A layer was taken out of a window
    RemovedFromWindow => "on_removed_from_window" { layer: LayerId, window: WindowId }

    /// A layer changed
    UpdatedLayer => "on_updated_layer" { layer: LayerId }
    /// A model changed
    UpdatedModel => "on_updated_model" { model: ModelId }
    /// A plot changed
    UpdatedPlot => "on_updated_plot" { plot: PlotId, layer: LayerId }
    /// The regions of interest changed
    UpdatedRois => "on_updated_rois" { rois: Vec<RoiBounds> }
    /// Statistics were recomputed for a layer
    UpdatedStats => "on_updated_stats" { stats: Stats, layer: LayerId }

    /// A plot was selected
    SelectedPlot => "on_selected_plot" { layer: LayerId }
    /// A window was selected
    SelectedWindow => "on_selected_window" { window: WindowId }
    /// A layer tree row was selected
    SelectedLayer => "on_selected_layer" { layer_item: LayerItemId }
    /// A model tree row was selected
    SelectedModel => "on_selected_model" { model_item: ModelItemId }

    /// A layer tree row was clicked
    ClickedLayer => "on_clicked_layer" { layer_item: LayerItemId }
    /// A layer tree row was edited
    ChangedLayer => "on_changed_layer" { layer_item: LayerItemId }
    /// A model tree row was edited
    ChangedModel => "on_changed_model" { model_item: ModelItemId }

    /// Request: add a model to a layer
    AddModel => "on_add_model" { layer: LayerId }
    /// Request: open a window for a data set
    AddWindow => "on_add_window" { data: DataId, window: WindowId }
    /// Request: add a layer, optionally cut from the current ROI
    AddLayer => "on_add_layer" { window: WindowId, layer: LayerId, from_roi: bool }
    /// Request: add a region of interest
    AddRoi => "on_add_roi" {}

    /// Request: refit the model of a layer
    UpdateModel => "on_update_model" { layer: LayerId }

    /// Request: remove a data set
    RemoveData => "on_remove_data" { data: DataId }
    /// Request: remove a layer
    RemoveLayer => "on_remove_layer" { layer: LayerId }
    /// Request: remove a model
    RemoveModel => "on_remove_model" { model: ModelId }
    /// Request: remove every data set
    RemoveAllData => "on_remove_all_data" {}

    /// A file was chosen in the open dialog
    FileOpen => "on_file_open" { file_name: PathBuf }
    /// A file should be read with the given loader filter
    FileRead => "on_file_read" { file_name: PathBuf, file_filter: String }

    /// Show a message in the status bar for `timeout` (zero keeps it)
    StatusMessage => "on_status_message" { message: String, timeout: Duration }
}
