//! The viewer capability trait.

use crate::marker::{MarkerDescriptor, MarkerId, MarkerPatch};

/// Capability set the annotation engine consumes from the panorama viewer.
///
/// The real projection engine is external; anything implementing this
/// trait can host the annotation layer. Marker operations are idempotent
/// where the original viewer was forgiving: adding an existing id replaces
/// it, removing or patching an absent id is a no-op.
pub trait PanoramaViewer {
    /// Current zoom level as a 0–100 percentage.
    fn zoom_level(&self) -> f64;

    /// Adds a marker, replacing any marker with the same id.
    fn add_marker(&mut self, descriptor: MarkerDescriptor);

    /// Applies a partial update to an existing marker.
    fn update_marker(&mut self, id: MarkerId, patch: MarkerPatch);

    /// Removes a marker if present.
    fn remove_marker(&mut self, id: MarkerId);

    /// Removes every marker.
    fn clear_markers(&mut self);

    /// Readable snapshot of all current markers.
    fn markers(&self) -> Vec<MarkerDescriptor>;

    /// Looks up a single marker by id.
    fn marker(&self, id: MarkerId) -> Option<MarkerDescriptor>;

    /// Shows or hides a marker if present.
    fn set_visible(&mut self, id: MarkerId, visible: bool) {
        self.update_marker(
            id,
            MarkerPatch {
                visible: Some(visible),
                ..MarkerPatch::default()
            },
        );
    }
}
