//! Persisted domain model: lots, roads and points of interest.
//!
//! These are the entities an operator draws over the panorama and the
//! backend stores per project. Numeric codes (`LotStatus`, `PoiSize`)
//! mirror the backend schema so records round-trip unchanged.

use serde::{Deserialize, Serialize};

use crate::geo::SphericalPoint;

/// Backend row identifier for a persisted entity.
pub type EntityId = i64;

/// Backend identifier for a project (one panorama).
pub type ProjectId = i64;

/// Commercial status of a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotStatus {
    /// Lot is for sale.
    Available,
    /// Lot is reserved by a buyer.
    Reserved,
    /// Lot has been sold.
    Sold,
}

impl LotStatus {
    /// Backend status code (1 = available, 2 = reserved, 3 = sold).
    pub fn code(&self) -> i32 {
        match self {
            LotStatus::Available => 1,
            LotStatus::Reserved => 2,
            LotStatus::Sold => 3,
        }
    }

    /// Decodes a backend status code. Unknown codes read as `Sold`, the
    /// catch-all the original viewer used for its status coloring.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => LotStatus::Available,
            2 => LotStatus::Reserved,
            _ => LotStatus::Sold,
        }
    }

    /// Status color used for the badge fill.
    pub fn color(&self) -> &'static str {
        match self {
            LotStatus::Available => "#10b981",
            LotStatus::Reserved => "#2563eb",
            LotStatus::Sold => "#ef4444",
        }
    }
}

/// Stroke line-cap style for road polylines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Rounded line ends.
    #[default]
    Round,
    /// Squared-off line ends.
    Square,
}

impl LineCap {
    /// SVG `stroke-linecap` value.
    pub fn as_svg(&self) -> &'static str {
        match self {
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Display size of a point-of-interest pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiSize {
    /// Small pill.
    Small,
    /// Medium pill (default).
    Medium,
    /// Large pill.
    Large,
}

impl PoiSize {
    /// Backend size code (1 = small, 2 = medium, 3 = large).
    pub fn code(&self) -> i32 {
        match self {
            PoiSize::Small => 1,
            PoiSize::Medium => 2,
            PoiSize::Large => 3,
        }
    }

    /// Decodes a backend size code, defaulting to medium.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => PoiSize::Small,
            3 => PoiSize::Large,
            _ => PoiSize::Medium,
        }
    }
}

/// Which side of the anchor the point-of-interest pill hangs toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiOrientation {
    /// Pill extends to the left of the anchor.
    Left,
    /// Pill extends to the right of the anchor (default).
    #[default]
    Right,
}

impl PoiOrientation {
    /// CSS class fragment used by the marker HTML.
    pub fn as_class(&self) -> &'static str {
        match self {
            PoiOrientation::Left => "left",
            PoiOrientation::Right => "right",
        }
    }
}

/// A real-estate lot: a closed polygon with sale attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    /// Backend row id.
    pub id: EntityId,
    /// Lot number, unique per project (case-sensitive).
    pub number: String,
    /// Commercial status.
    pub status: LotStatus,
    /// Sale price.
    pub price: i64,
    /// Surface area in square meters.
    pub area: i64,
    /// Base stroke width before zoom scaling.
    pub stroke_width: f64,
    /// Polygon vertices; order defines edges.
    pub polygon: Vec<SphericalPoint>,
}

/// A road: an open polyline with stroke styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    /// Backend row id.
    pub id: EntityId,
    /// Polyline vertices; order defines segments.
    pub path: Vec<SphericalPoint>,
    /// Base stroke width before zoom scaling.
    pub width: f64,
    /// Stroke color as a hex string.
    pub color: String,
    /// Line-cap style.
    pub cap: LineCap,
}

/// A point of interest: an anchored label with a leader line and pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Backend row id.
    pub id: EntityId,
    /// Title shown in the pill.
    pub title: String,
    /// Optional subtitle.
    pub description: Option<String>,
    /// Anchor point on the sphere.
    pub anchor: SphericalPoint,
    /// Leader line height in pixels.
    pub height: f64,
    /// Pill size.
    pub size: PoiSize,
    /// Pill orientation relative to the anchor.
    pub orientation: PoiOrientation,
    /// Pill/line/pin background color.
    pub background: String,
    /// Pill text color.
    pub text_color: String,
}

/// Discriminator for the three persisted entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Real-estate lot polygon.
    Lot,
    /// Road polyline.
    Road,
    /// Point-of-interest marker.
    Poi,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Lot => write!(f, "lot"),
            EntityKind::Road => write!(f, "road"),
            EntityKind::Poi => write!(f, "poi"),
        }
    }
}

/// A persisted annotation of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    /// Lot polygon.
    Lot(Lot),
    /// Road polyline.
    Road(Road),
    /// Point of interest.
    Poi(Poi),
}

impl Entity {
    /// Backend row id of the entity.
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Lot(l) => l.id,
            Entity::Road(r) => r.id,
            Entity::Poi(p) => p.id,
        }
    }

    /// Kind discriminator.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Lot(_) => EntityKind::Lot,
            Entity::Road(_) => EntityKind::Road,
            Entity::Poi(_) => EntityKind::Poi,
        }
    }

    /// Vertices used for snap-point generation. POIs expose none: their
    /// anchor is never a snap target.
    pub fn snap_vertices(&self) -> &[SphericalPoint] {
        match self {
            Entity::Lot(l) => &l.polygon,
            Entity::Road(r) => &r.path,
            Entity::Poi(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in [LotStatus::Available, LotStatus::Reserved, LotStatus::Sold] {
            assert_eq!(LotStatus::from_code(status.code()), status);
        }
        // Unknown codes fall back to the sold coloring.
        assert_eq!(LotStatus::from_code(99), LotStatus::Sold);
    }

    #[test]
    fn status_colors() {
        assert_eq!(LotStatus::Available.color(), "#10b981");
        assert_eq!(LotStatus::Reserved.color(), "#2563eb");
        assert_eq!(LotStatus::Sold.color(), "#ef4444");
    }

    #[test]
    fn poi_size_codes_round_trip() {
        for size in [PoiSize::Small, PoiSize::Medium, PoiSize::Large] {
            assert_eq!(PoiSize::from_code(size.code()), size);
        }
        assert_eq!(PoiSize::from_code(0), PoiSize::Medium);
    }

    #[test]
    fn poi_has_no_snap_vertices() {
        let poi = Poi {
            id: 7,
            title: "Club House".into(),
            description: None,
            anchor: SphericalPoint::new(0.1, 0.2),
            height: 100.0,
            size: PoiSize::Medium,
            orientation: PoiOrientation::Right,
            background: "#ef4444".into(),
            text_color: "#ffffff".into(),
        };
        assert!(Entity::Poi(poi).snap_vertices().is_empty());
    }
}
