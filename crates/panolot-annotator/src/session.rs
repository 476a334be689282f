//! The drawing session: current mode, draft and snap target.

use serde::{Deserialize, Serialize};

use panolot_core::{EntityId, SphericalPoint};

use crate::reconcile::EditorKind;

/// Active annotation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Drawing lot polygons.
    Lot,
    /// Drawing road polylines.
    Road,
    /// Placing points of interest.
    Poi,
    /// Deleting existing annotations.
    Delete,
}

impl Mode {
    /// Whether this mode draws multi-point shapes with snapping.
    pub fn is_shape_drawing(&self) -> bool {
        matches!(self, Mode::Lot | Mode::Road)
    }
}

/// The in-progress, uncommitted shape.
///
/// Exists only during an active drawing or editing session and is cleared
/// on commit, cancel or mode switch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    /// Captured points, in drawing order.
    pub points: Vec<SphericalPoint>,
    /// Id of the persisted entity being edited in place, if any.
    pub editing: Option<EntityId>,
    /// Whether a provisional point-of-interest marker is on screen.
    pub has_temp_poi: bool,
}

impl Draft {
    /// True when nothing has been drawn or targeted yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.editing.is_none() && !self.has_temp_poi
    }
}

/// Complete state owned by the annotation machine.
///
/// Invariants: at most one mode is active; `draft.editing` is set only
/// while editing an existing entity and cleared on any mode change; the
/// snap target is shared between the enter/leave handlers that write it
/// and the click handler that reads it, all on one event loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Active tool, or `None` when idle.
    pub mode: Option<Mode>,
    /// In-progress shape.
    pub draft: Draft,
    /// Position of the snap point currently hovered, if any.
    pub active_snap: Option<SphericalPoint>,
    /// Editor currently open, if any.
    pub editor: Option<EditorKind>,
    /// Entity awaiting delete confirmation, if any.
    pub pending_delete: Option<EntityId>,
}

impl Session {
    /// A fresh idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a drawing tool is active (not delete, not idle).
    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, Some(m) if m != Mode::Delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_idle() {
        let s = Session::new();
        assert_eq!(s.mode, None);
        assert!(s.draft.is_empty());
        assert!(!s.is_drawing());
    }

    #[test]
    fn shape_drawing_modes() {
        assert!(Mode::Lot.is_shape_drawing());
        assert!(Mode::Road.is_shape_drawing());
        assert!(!Mode::Poi.is_shape_drawing());
        assert!(!Mode::Delete.is_shape_drawing());
    }
}
