//! In-memory viewer used by tests and headless runs.

use std::collections::HashMap;

use crate::marker::{MarkerDescriptor, MarkerId, MarkerPatch, MarkerShape};
use crate::viewer::PanoramaViewer;

/// A [`PanoramaViewer`] holding markers in a plain map.
///
/// Zoom is settable so tests can exercise the scale curves at arbitrary
/// levels. Insertion order is tracked so snapshots are deterministic.
#[derive(Debug, Default)]
pub struct MemoryViewer {
    markers: HashMap<MarkerId, MarkerDescriptor>,
    order: Vec<MarkerId>,
    zoom: f64,
}

impl MemoryViewer {
    /// Creates an empty viewer at zoom 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reported zoom level (0–100).
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(0.0, 100.0);
    }

    /// Number of markers currently held.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when no markers are held.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Ids of all temporary (drawing-session) markers.
    pub fn temporary_ids(&self) -> Vec<MarkerId> {
        self.order.iter().copied().filter(MarkerId::is_temporary).collect()
    }

    /// Ids of all snap helper markers.
    pub fn snap_ids(&self) -> Vec<MarkerId> {
        self.order.iter().copied().filter(MarkerId::is_snap).collect()
    }
}

impl PanoramaViewer for MemoryViewer {
    fn zoom_level(&self) -> f64 {
        self.zoom
    }

    fn add_marker(&mut self, descriptor: MarkerDescriptor) {
        let id = descriptor.id;
        if self.markers.insert(id, descriptor).is_none() {
            self.order.push(id);
        }
    }

    fn update_marker(&mut self, id: MarkerId, patch: MarkerPatch) {
        let Some(marker) = self.markers.get_mut(&id) else {
            return;
        };
        if let Some(style) = patch.style {
            marker.style = style;
        }
        if let Some(html) = patch.html {
            if let MarkerShape::Html { html: existing, .. } = &mut marker.shape {
                *existing = html;
            }
        }
        if let Some(visible) = patch.visible {
            marker.visible = visible;
        }
        // content_scale is a presentation detail the host viewer applies;
        // nothing to record beyond accepting the patch.
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            self.order.retain(|m| *m != id);
        }
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
        self.order.clear();
    }

    fn markers(&self) -> Vec<MarkerDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.markers.get(id).cloned())
            .collect()
    }

    fn marker(&self, id: MarkerId) -> Option<MarkerDescriptor> {
        self.markers.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{MarkerPayload, SvgStyle};
    use panolot_core::SphericalPoint;

    fn dot(id: MarkerId) -> MarkerDescriptor {
        MarkerDescriptor::new(
            id,
            MarkerShape::Polyline(vec![SphericalPoint::new(0.0, 0.0)]),
            SvgStyle::default(),
            MarkerPayload::temp(),
        )
    }

    #[test]
    fn add_replaces_same_id() {
        let mut v = MemoryViewer::new();
        v.add_marker(dot(MarkerId::Preview));
        v.add_marker(dot(MarkerId::Preview));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut v = MemoryViewer::new();
        v.remove_marker(MarkerId::Elastic);
        assert!(v.is_empty());
    }

    #[test]
    fn visibility_patch_applies() {
        let mut v = MemoryViewer::new();
        v.add_marker(dot(MarkerId::TempPoint(1)));
        v.set_visible(MarkerId::TempPoint(1), false);
        assert!(!v.marker(MarkerId::TempPoint(1)).unwrap().visible);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut v = MemoryViewer::new();
        v.set_zoom(150.0);
        assert_eq!(v.zoom_level(), 100.0);
    }
}
