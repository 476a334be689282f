//! Zoom-adaptive restyling of rendered markers.
//!
//! Stroke widths and badge text are stored at their base (100% zoom)
//! values; on every zoom change the on-screen markers are patched with
//! widths recomputed through the per-kind scale curves. Patching in place
//! avoids the flicker a full remove/re-add cycle would cause.

use panolot_core::{badge_text_scale, lot_scale, road_scale, Entity, MIN_LOT_STROKE, MIN_ROAD_STROKE};
use panolot_viewer::{MarkerId, MarkerPatch, PanoramaViewer, SvgStyle};

/// Style patches for every persisted marker at the given zoom.
///
/// A patch replaces the whole style, so each one carries the full look of
/// its marker with only the width recomputed. Temporary draft markers are
/// not touched here; the machine rebuilds those when settings or zoom
/// change.
pub fn restyle_patches(entities: &[Entity], zoom: f64) -> Vec<(MarkerId, MarkerPatch)> {
    let mut patches = Vec::new();
    for entity in entities {
        match entity {
            Entity::Lot(lot) => {
                patches.push((
                    MarkerId::Polygon(lot.id),
                    MarkerPatch {
                        style: Some(
                            SvgStyle::default()
                                .fill("rgba(255,255,255,0.0)")
                                .stroke("white")
                                .stroke_width(
                                    (lot.stroke_width * lot_scale(zoom)).max(MIN_LOT_STROKE),
                                ),
                        ),
                        ..MarkerPatch::default()
                    },
                ));
                patches.push((
                    MarkerId::Badge(lot.id),
                    MarkerPatch {
                        content_scale: Some(badge_text_scale(zoom)),
                        ..MarkerPatch::default()
                    },
                ));
            }
            Entity::Road(road) => {
                patches.push((
                    MarkerId::Road(road.id),
                    MarkerPatch {
                        style: Some(
                            SvgStyle::default()
                                .stroke(road.color.clone())
                                .stroke_width((road.width * road_scale(zoom)).max(MIN_ROAD_STROKE))
                                .stroke_opacity(0.8)
                                .linecap(road.cap.as_svg()),
                        ),
                        ..MarkerPatch::default()
                    },
                ));
            }
            // POI pills keep their CSS size; no stroke to rescale.
            Entity::Poi(_) => {}
        }
    }
    patches
}

/// Applies the restyle patches to the viewer at its current zoom.
pub fn restyle_all<V: PanoramaViewer>(viewer: &mut V, entities: &[Entity]) {
    let zoom = viewer.zoom_level();
    for (id, patch) in restyle_patches(entities, zoom) {
        viewer.update_marker(id, patch);
    }
}
