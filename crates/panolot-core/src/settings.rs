//! Operator-editable live settings.
//!
//! Settings are a process-wide value object populated by the UI
//! reconciliation layer and passed into commit functions explicitly; the
//! annotation machine never reads them ambiently. They are not persisted
//! as part of the entity schema except where copied into payload fields
//! (for example a lot's stroke width).

use serde::{Deserialize, Serialize};

use crate::model::{LineCap, PoiOrientation, PoiSize};

/// Current drawing defaults for new shapes and live previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSettings {
    /// Base stroke width for lot polygons.
    pub lot_stroke_width: f64,
    /// Base stroke width for road polylines.
    pub road_width: f64,
    /// Stroke color for road polylines.
    pub road_color: String,
    /// Line-cap style for road polylines.
    pub road_cap: LineCap,
    /// Leader line height for points of interest, in pixels.
    pub poi_height: f64,
    /// Pill size for points of interest.
    pub poi_size: PoiSize,
    /// Pill orientation for points of interest.
    pub poi_orientation: PoiOrientation,
    /// Pill background color for points of interest.
    pub poi_background: String,
    /// Pill text color for points of interest.
    pub poi_text_color: String,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            lot_stroke_width: 4.0,
            road_width: 15.0,
            road_color: "#ffffff".to_string(),
            road_cap: LineCap::Round,
            poi_height: 100.0,
            poi_size: PoiSize::Medium,
            poi_orientation: PoiOrientation::Right,
            poi_background: "#ef4444".to_string(),
            poi_text_color: "#ffffff".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_drawing_defaults() {
        let s = LiveSettings::default();
        assert_eq!(s.lot_stroke_width, 4.0);
        assert_eq!(s.road_width, 15.0);
        assert_eq!(s.road_cap, LineCap::Round);
        assert_eq!(s.poi_height, 100.0);
        assert_eq!(s.poi_size, PoiSize::Medium);
        assert_eq!(s.poi_orientation, PoiOrientation::Right);
    }
}
