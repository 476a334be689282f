//! Events emitted by the panorama viewer.
//!
//! All of these arrive on the single UI event loop; the annotation engine
//! consumes them in arrival order. Ordering matters for snapping: an
//! `EnterMarker` on a snap point must be seen before the following `Click`
//! for the magnetism to apply.

use serde::{Deserialize, Serialize};

use panolot_core::SphericalPoint;

use crate::marker::MarkerId;

/// An event from the viewer/projection collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewerEvent {
    /// The panorama finished loading. Fired once.
    Ready,
    /// The zoom level changed; payload is the new 0–100 percentage.
    ZoomUpdated(f64),
    /// Pointer click resolved to sphere coordinates.
    Click(SphericalPoint),
    /// Pointer move resolved to sphere coordinates.
    MouseMove(SphericalPoint),
    /// An interactive marker was selected.
    SelectMarker(MarkerId),
    /// Pointer entered a marker.
    EnterMarker(MarkerId),
    /// Pointer left a marker.
    LeaveMarker(MarkerId),
}
