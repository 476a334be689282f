//! Marker descriptors for the panorama viewer.
//!
//! Every rendered element is a marker. Marker identity is a tagged union
//! rather than a string convention: the kind of a marker is never inferred
//! from an identifier prefix, it travels explicitly in the id and in the
//! descriptor payload.

use serde::{Deserialize, Serialize};

use panolot_core::{EntityId, SphericalPoint};

/// Identity of a marker in the viewer.
///
/// `Display` produces a stable string for host viewers that key markers by
/// string id; the enum itself stays the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerId {
    /// Snap helper at vertex `vertex` of entity `entity`.
    Snap {
        /// Owning entity.
        entity: EntityId,
        /// Vertex index within the entity's point sequence.
        vertex: usize,
    },
    /// Temporary dot for the n-th draft point (1-based).
    TempPoint(usize),
    /// Provisional point-of-interest marker while its editor is open.
    TempPoi,
    /// Live preview of the in-progress polygon/polyline.
    Preview,
    /// Elastic-band segment from the last draft point to the pointer.
    Elastic,
    /// Committed lot polygon.
    Polygon(EntityId),
    /// Lot number badge at the polygon centroid.
    Badge(EntityId),
    /// Committed road polyline.
    Road(EntityId),
    /// Committed point of interest.
    Poi(EntityId),
}

impl MarkerId {
    /// True for markers that exist only during a drawing session and are
    /// swept away on cancel or commit.
    pub fn is_temporary(&self) -> bool {
        matches!(
            self,
            MarkerId::TempPoint(_) | MarkerId::TempPoi | MarkerId::Preview | MarkerId::Elastic
        )
    }

    /// True for snap helper markers.
    pub fn is_snap(&self) -> bool {
        matches!(self, MarkerId::Snap { .. })
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerId::Snap { entity, vertex } => write!(f, "snap:{entity}:{vertex}"),
            MarkerId::TempPoint(n) => write!(f, "temp:{n}"),
            MarkerId::TempPoi => write!(f, "temp:poi"),
            MarkerId::Preview => write!(f, "preview"),
            MarkerId::Elastic => write!(f, "elastic"),
            MarkerId::Polygon(id) => write!(f, "polygon:{id}"),
            MarkerId::Badge(id) => write!(f, "badge:{id}"),
            MarkerId::Road(id) => write!(f, "road:{id}"),
            MarkerId::Poi(id) => write!(f, "poi:{id}"),
        }
    }
}

/// Role of a marker, carried explicitly in its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Lot polygon outline.
    Lot,
    /// Lot number badge.
    Badge,
    /// Road polyline.
    Road,
    /// Point of interest.
    Poi,
    /// Snap helper.
    Snap,
    /// Transient drawing aid.
    Temp,
}

/// Back-reference payload attached to every marker.
///
/// Lets a pointer-selection event resolve back to a domain entity without
/// a separate lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPayload {
    /// Persisted entity this marker renders, if any.
    pub entity_id: Option<EntityId>,
    /// Role of the marker.
    pub kind: MarkerKind,
    /// Whether pointer selection on this marker is meaningful.
    pub interactive: bool,
    /// Position carried by snap markers so a click can land exactly on
    /// the snapped vertex.
    pub position: Option<SphericalPoint>,
}

impl MarkerPayload {
    /// Payload for a marker rendering persisted entity `id`.
    pub fn entity(id: EntityId, kind: MarkerKind) -> Self {
        Self {
            entity_id: Some(id),
            kind,
            interactive: true,
            position: None,
        }
    }

    /// Payload for a transient drawing aid.
    pub fn temp() -> Self {
        Self {
            entity_id: None,
            kind: MarkerKind::Temp,
            interactive: false,
            position: None,
        }
    }

    /// Payload for a snap helper at `position` on entity `id`.
    pub fn snap(id: EntityId, position: SphericalPoint) -> Self {
        Self {
            entity_id: Some(id),
            kind: MarkerKind::Snap,
            interactive: true,
            position: Some(position),
        }
    }
}

/// Anchoring of an HTML marker relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Centered on the position.
    #[default]
    CenterCenter,
    /// Bottom edge on the position.
    BottomCenter,
}

/// Geometry of a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkerShape {
    /// Closed polygon over sphere coordinates.
    Polygon(Vec<SphericalPoint>),
    /// Open polyline over sphere coordinates.
    Polyline(Vec<SphericalPoint>),
    /// Anchored HTML element.
    Html {
        /// Raw HTML content.
        html: String,
        /// Anchor position on the sphere.
        position: SphericalPoint,
        /// Anchoring relative to the position.
        anchor: Anchor,
    },
}

/// SVG styling applied to polygon/polyline markers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SvgStyle {
    /// Stroke color.
    pub stroke: Option<String>,
    /// Stroke width in pixels.
    pub stroke_width: Option<f64>,
    /// Stroke opacity (0.0–1.0).
    pub stroke_opacity: Option<f64>,
    /// SVG `stroke-linecap` value.
    pub stroke_linecap: Option<String>,
    /// SVG `stroke-dasharray` value.
    pub stroke_dasharray: Option<String>,
    /// Fill color (`transparent` for outlines).
    pub fill: Option<String>,
    /// Whether pointer events pass through (`none` disables hit testing).
    pub pointer_events: Option<String>,
}

impl SvgStyle {
    /// Sets the stroke color.
    pub fn stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = Some(color.into());
        self
    }

    /// Sets the stroke width.
    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Sets the stroke opacity.
    pub fn stroke_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = Some(opacity);
        self
    }

    /// Sets the line-cap style.
    pub fn linecap(mut self, cap: impl Into<String>) -> Self {
        self.stroke_linecap = Some(cap.into());
        self
    }

    /// Sets the dash pattern.
    pub fn dasharray(mut self, dashes: impl Into<String>) -> Self {
        self.stroke_dasharray = Some(dashes.into());
        self
    }

    /// Sets the fill color.
    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Disables pointer events so the marker never swallows clicks.
    pub fn no_pointer_events(mut self) -> Self {
        self.pointer_events = Some("none".to_string());
        self
    }
}

/// A complete renderable marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    /// Marker identity.
    pub id: MarkerId,
    /// Marker geometry.
    pub shape: MarkerShape,
    /// SVG styling (ignored by HTML markers).
    pub style: SvgStyle,
    /// Whether the marker is currently shown.
    pub visible: bool,
    /// Back-reference payload.
    pub payload: MarkerPayload,
}

impl MarkerDescriptor {
    /// Creates a visible marker with the given parts.
    pub fn new(id: MarkerId, shape: MarkerShape, style: SvgStyle, payload: MarkerPayload) -> Self {
        Self {
            id,
            shape,
            style,
            visible: true,
            payload,
        }
    }

    /// Marks the descriptor as initially hidden (snap helpers).
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Partial update applied to an existing marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerPatch {
    /// New SVG style, if changing.
    pub style: Option<SvgStyle>,
    /// New HTML content, if changing (HTML markers only).
    pub html: Option<String>,
    /// New visibility, if changing.
    pub visible: Option<bool>,
    /// CSS scale transform applied to the marker content (badges).
    pub content_scale: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_and_snap_classification() {
        assert!(MarkerId::Preview.is_temporary());
        assert!(MarkerId::Elastic.is_temporary());
        assert!(MarkerId::TempPoint(3).is_temporary());
        assert!(MarkerId::TempPoi.is_temporary());
        assert!(!MarkerId::Polygon(1).is_temporary());
        assert!(MarkerId::Snap { entity: 1, vertex: 0 }.is_snap());
        assert!(!MarkerId::Badge(1).is_snap());
    }

    #[test]
    fn display_is_stable() {
        assert_eq!(MarkerId::Snap { entity: 4, vertex: 2 }.to_string(), "snap:4:2");
        assert_eq!(MarkerId::Badge(9).to_string(), "badge:9");
        assert_eq!(MarkerId::Elastic.to_string(), "elastic");
    }
}
