//! Side-effecting commands emitted by the annotation machine.
//!
//! A transition never touches the viewer or the network itself; it
//! returns a list of effects for the engine to execute in order. This
//! keeps every transition deterministic and unit-testable.

use panolot_core::{EntityId, SphericalPoint};
use panolot_viewer::{MarkerDescriptor, MarkerId, MarkerPatch};

use crate::reconcile::{EditorKind, LotAttributes, PoiAttributes};

/// A command for the engine to run after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Add (or replace) a marker in the viewer.
    AddMarker(MarkerDescriptor),
    /// Patch an existing marker.
    UpdateMarker(MarkerId, MarkerPatch),
    /// Remove a marker if present.
    RemoveMarker(MarkerId),
    /// Show or hide every snap helper marker.
    SetSnapVisibility(bool),
    /// Open the given editor.
    OpenEditor(EditorKind),
    /// Close whatever editor is open.
    CloseEditor,
    /// Update the status line shown to the operator.
    Status(String),
    /// Surface a blocking notice (validation or transport failure).
    Notify(String),
    /// Persist a lot draft.
    CommitLot {
        /// Validated lot attributes.
        attrs: LotAttributes,
        /// Polygon captured in the draft.
        points: Vec<SphericalPoint>,
        /// Entity being replaced when editing in place.
        editing: Option<EntityId>,
    },
    /// Persist a road draft using the live settings at commit time.
    CommitRoad {
        /// Polyline captured in the draft.
        points: Vec<SphericalPoint>,
        /// Entity being replaced when editing in place.
        editing: Option<EntityId>,
    },
    /// Persist a point of interest.
    CommitPoi {
        /// Validated point-of-interest attributes.
        attrs: PoiAttributes,
        /// Anchor captured in the draft.
        anchor: SphericalPoint,
        /// Entity being replaced when editing in place.
        editing: Option<EntityId>,
    },
    /// Delete a persisted entity and reload.
    DeleteEntity(EntityId),
    /// Reload the full entity set from the backend and re-render.
    Reload,
    /// Re-style every rendered marker for the current zoom.
    RestyleAll,
}
