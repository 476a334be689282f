//! Marker projection: domain entities to renderable descriptors.
//!
//! Pure mapping functions, one per entity kind. Given the same entity and
//! settings the output is identical, which is what makes the full-reload
//! render cycle idempotent.

use panolot_core::{
    lot_scale, polygon_centroid, road_scale, Entity, LiveSettings, Lot, Poi, PoiOrientation,
    PoiSize, Road, SphericalPoint, MIN_LOT_STROKE, MIN_ROAD_STROKE,
};
use panolot_viewer::{
    Anchor, MarkerDescriptor, MarkerId, MarkerKind, MarkerPayload, MarkerShape, SvgStyle,
};

use crate::session::Mode;

const SNAP_HTML: &str = "<div class=\"snap-marker\"></div>";
const TEMP_POINT_HTML: &str = "<div class=\"temp-point\"></div>";

/// Placeholder title for a provisional point of interest.
pub const NEW_POI_TITLE: &str = "New point";

/// Markers for a lot: the white-stroked polygon plus a number badge at
/// the polygon's visual center. Returns just the polygon when the badge
/// position cannot be computed (empty polygon).
pub fn lot_markers(lot: &Lot) -> Vec<MarkerDescriptor> {
    let polygon = MarkerDescriptor::new(
        MarkerId::Polygon(lot.id),
        MarkerShape::Polygon(lot.polygon.clone()),
        SvgStyle::default()
            .fill("rgba(255,255,255,0.0)")
            .stroke("white")
            .stroke_width(lot.stroke_width),
        MarkerPayload::entity(lot.id, MarkerKind::Lot),
    );

    let mut markers = vec![polygon];
    if let Some(center) = polygon_centroid(&lot.polygon) {
        markers.push(MarkerDescriptor::new(
            MarkerId::Badge(lot.id),
            MarkerShape::Html {
                html: badge_html(lot),
                position: center,
                anchor: Anchor::CenterCenter,
            },
            SvgStyle::default(),
            MarkerPayload::entity(lot.id, MarkerKind::Badge),
        ));
    }
    markers
}

/// Marker for a road polyline with its stored color, width and cap.
pub fn road_marker(road: &Road) -> MarkerDescriptor {
    MarkerDescriptor::new(
        MarkerId::Road(road.id),
        MarkerShape::Polyline(road.path.clone()),
        SvgStyle::default()
            .stroke(road.color.clone())
            .stroke_width(road.width)
            .stroke_opacity(0.8)
            .linecap(road.cap.as_svg()),
        MarkerPayload::entity(road.id, MarkerKind::Road),
    )
}

/// Marker for a point of interest: pill, leader line and pin.
pub fn poi_marker(poi: &Poi) -> MarkerDescriptor {
    MarkerDescriptor::new(
        MarkerId::Poi(poi.id),
        MarkerShape::Html {
            html: poi_html(
                &poi.title,
                poi.description.as_deref(),
                poi.height,
                &poi.background,
                &poi.text_color,
                poi.orientation,
                poi.size,
            ),
            position: poi.anchor,
            anchor: Anchor::CenterCenter,
        },
        SvgStyle::default(),
        MarkerPayload::entity(poi.id, MarkerKind::Poi),
    )
}

/// Hidden snap helpers for every vertex of a lot or road. POIs yield
/// none: their anchors are never snap targets.
pub fn snap_markers(entity: &Entity) -> Vec<MarkerDescriptor> {
    entity
        .snap_vertices()
        .iter()
        .enumerate()
        .map(|(vertex, point)| {
            MarkerDescriptor::new(
                MarkerId::Snap {
                    entity: entity.id(),
                    vertex,
                },
                MarkerShape::Html {
                    html: SNAP_HTML.to_string(),
                    position: *point,
                    anchor: Anchor::CenterCenter,
                },
                SvgStyle::default(),
                MarkerPayload::snap(entity.id(), *point),
            )
            .hidden()
        })
        .collect()
}

/// Temporary dot for the n-th captured draft point (1-based).
pub fn temp_point_marker(index: usize, position: SphericalPoint) -> MarkerDescriptor {
    MarkerDescriptor::new(
        MarkerId::TempPoint(index),
        MarkerShape::Html {
            html: TEMP_POINT_HTML.to_string(),
            position,
            anchor: Anchor::CenterCenter,
        },
        SvgStyle::default(),
        MarkerPayload::temp(),
    )
}

/// Live preview of the in-progress shape, styled with the scale curve for
/// the current zoom so it matches the committed rendering.
pub fn preview_marker(
    mode: Mode,
    points: &[SphericalPoint],
    settings: &LiveSettings,
    zoom: f64,
) -> Option<MarkerDescriptor> {
    if points.len() < 2 {
        return None;
    }
    let descriptor = match mode {
        Mode::Road => MarkerDescriptor::new(
            MarkerId::Preview,
            MarkerShape::Polyline(points.to_vec()),
            SvgStyle::default()
                .stroke(settings.road_color.clone())
                .stroke_width((settings.road_width * road_scale(zoom)).max(MIN_ROAD_STROKE))
                .stroke_opacity(0.8)
                .linecap("butt")
                .no_pointer_events(),
            MarkerPayload::temp(),
        ),
        Mode::Lot => MarkerDescriptor::new(
            MarkerId::Preview,
            MarkerShape::Polygon(points.to_vec()),
            SvgStyle::default()
                .fill("transparent")
                .stroke("white")
                .stroke_width((settings.lot_stroke_width * lot_scale(zoom)).max(MIN_LOT_STROKE))
                .no_pointer_events(),
            MarkerPayload::temp(),
        ),
        Mode::Poi | Mode::Delete => return None,
    };
    Some(descriptor)
}

/// The elastic band: a dashed segment from the last captured point to the
/// hovered snap point or the raw pointer position.
pub fn elastic_marker(
    mode: Mode,
    from: SphericalPoint,
    to: SphericalPoint,
    settings: &LiveSettings,
    zoom: f64,
) -> Option<MarkerDescriptor> {
    let (stroke, width) = match mode {
        Mode::Lot => (
            "white".to_string(),
            (settings.lot_stroke_width * lot_scale(zoom)).max(MIN_LOT_STROKE),
        ),
        Mode::Road => (
            settings.road_color.clone(),
            (settings.road_width * road_scale(zoom)).max(MIN_ROAD_STROKE),
        ),
        Mode::Poi | Mode::Delete => return None,
    };
    Some(MarkerDescriptor::new(
        MarkerId::Elastic,
        MarkerShape::Polyline(vec![from, to]),
        SvgStyle::default()
            .stroke(stroke)
            .stroke_width(width)
            .dasharray("5,5")
            .linecap("butt")
            .no_pointer_events(),
        MarkerPayload::temp(),
    ))
}

/// Provisional point-of-interest marker shown while its editor is open.
pub fn temp_poi_marker(position: SphericalPoint, settings: &LiveSettings) -> MarkerDescriptor {
    MarkerDescriptor::new(
        MarkerId::TempPoi,
        MarkerShape::Html {
            html: poi_html(
                NEW_POI_TITLE,
                None,
                settings.poi_height,
                &settings.poi_background,
                &settings.poi_text_color,
                settings.poi_orientation,
                settings.poi_size,
            ),
            position,
            anchor: Anchor::CenterCenter,
        },
        SvgStyle::default(),
        MarkerPayload::temp(),
    )
}

/// Badge HTML for a lot number.
///
/// Available lots get a white pill with dark text; every other status
/// fills the pill with the status color.
fn badge_html(lot: &Lot) -> String {
    let style = match lot.status {
        panolot_core::LotStatus::Available => {
            "background: white; color: #1e293b; border: 2px solid white;".to_string()
        }
        status => format!(
            "background: {}; border: 2px solid white; color: white;",
            status.color()
        ),
    };
    format!(
        "<div class=\"lot-badge-wrapper\">\
         <div class=\"lot-badge-content\" style=\"{style}\">{}</div>\
         </div>",
        lot.number
    )
}

/// HTML for a point-of-interest marker: title pill, optional subtitle,
/// leader line and anchor pin.
pub fn poi_html(
    title: &str,
    description: Option<&str>,
    height: f64,
    background: &str,
    text_color: &str,
    orientation: PoiOrientation,
    size: PoiSize,
) -> String {
    let subtitle = description
        .filter(|d| !d.is_empty())
        .map(|d| format!("<span class=\"poi-sub\" style=\"color:{text_color}CC\">{d}</span>"))
        .unwrap_or_default();
    format!(
        "<div class=\"poi-wrapper\">\
         <div class=\"poi-content {orient} size-{size}\">\
         <div class=\"poi-head\">\
         <div class=\"poi-pill\" style=\"background:{background}; color:{text_color};\">\
         <div style=\"line-height:1.2\">{title}</div>{subtitle}</div></div>\
         <div class=\"poi-line\" style=\"height: {height}px; background:{background};\"></div>\
         <div class=\"poi-anchor\" style=\"background:{background};\"></div>\
         </div></div>",
        orient = orientation.as_class(),
        size = size.code(),
    )
}
