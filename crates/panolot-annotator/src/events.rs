//! Input events driving the annotation machine.

use panolot_viewer::ViewerEvent;

use crate::reconcile::{LotAttributes, PoiAttributes};
use crate::session::Mode;

/// Everything that can advance the annotation state machine: viewer
/// events plus the commands the surrounding UI shell exposes.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer/zoom event from the panorama viewer.
    Viewer(ViewerEvent),
    /// Tool selection (`None` deactivates the current tool).
    SetMode(Option<Mode>),
    /// Explicit "finish" action (Enter) for multi-point shapes.
    FinishDrawing,
    /// Remove the last captured point (Ctrl+Z).
    UndoLastPoint,
    /// Abandon the current draft (Escape).
    CancelDraft,
    /// The operator closed the active editor without committing.
    CloseEditor,
    /// Validated lot attributes submitted from the lot editor.
    SubmitLot(LotAttributes),
    /// Validated point-of-interest attributes submitted from its editor.
    SubmitPoi(PoiAttributes),
    /// The operator confirmed the pending deletion.
    ConfirmDelete,
    /// Live settings changed while drawing; previews must re-style.
    SettingsChanged,
}

impl From<ViewerEvent> for InputEvent {
    fn from(event: ViewerEvent) -> Self {
        InputEvent::Viewer(event)
    }
}
