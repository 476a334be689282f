//! UI reconciliation: editor forms, prefill and live-settings merge.
//!
//! The surrounding shell owns the actual widgets; this module owns the
//! values that cross the boundary. Forms carry raw operator input as
//! strings, attribute structs carry validated values. Validation failures
//! are [`ValidationError`]s reported inline in the editor; nothing here
//! touches the network.

use serde::{Deserialize, Serialize};

use panolot_core::{
    LineCap, LiveSettings, Lot, LotStatus, Poi, PoiOrientation, PoiSize, ValidationError,
};

/// Which editor surface is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    /// Lot attribute editor.
    Lot,
    /// Point-of-interest editor.
    Poi,
    /// Delete confirmation dialog.
    ConfirmDelete,
}

/// Raw operator input from the lot editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotForm {
    /// Lot number field.
    pub number: String,
    /// Price field; may carry thousands separators.
    pub price: String,
    /// Area field; may carry thousands separators.
    pub area: String,
    /// Selected status.
    pub status: LotStatus,
    /// Stroke width slider value.
    pub stroke_width: f64,
}

impl LotForm {
    /// Pre-fills the form from an existing lot, formatting numbers the
    /// way the editor displays them.
    pub fn prefill(lot: &Lot) -> Self {
        Self {
            number: lot.number.clone(),
            price: group_thousands(lot.price),
            area: group_thousands(lot.area),
            status: lot.status,
            stroke_width: lot.stroke_width,
        }
    }
}

/// Validated lot attributes ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotAttributes {
    /// Lot number, unique per project.
    pub number: String,
    /// Commercial status.
    pub status: LotStatus,
    /// Price, separators stripped.
    pub price: i64,
    /// Area, separators stripped.
    pub area: i64,
    /// Base stroke width copied into the payload.
    pub stroke_width: f64,
}

/// Validates a lot form.
pub fn lot_attributes(form: &LotForm) -> Result<LotAttributes, ValidationError> {
    let number = form.number.trim();
    if number.is_empty() {
        return Err(ValidationError::MissingField {
            field: "number".to_string(),
        });
    }
    let price = parse_grouped(&form.price, "price")?;
    let area = parse_grouped(&form.area, "area")?;
    Ok(LotAttributes {
        number: number.to_string(),
        status: form.status,
        price,
        area,
        stroke_width: form.stroke_width,
    })
}

/// Raw operator input from the point-of-interest editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiForm {
    /// Title field.
    pub title: String,
    /// Description field, may be empty.
    pub description: String,
    /// Leader line height.
    pub height: f64,
    /// Pill background color.
    pub background: String,
    /// Pill text color.
    pub text_color: String,
    /// Pill size selector.
    pub size: PoiSize,
    /// Pill orientation selector.
    pub orientation: PoiOrientation,
}

impl PoiForm {
    /// Pre-fills the form from an existing point of interest.
    pub fn prefill(poi: &Poi) -> Self {
        Self {
            title: poi.title.clone(),
            description: poi.description.clone().unwrap_or_default(),
            height: poi.height,
            background: poi.background.clone(),
            text_color: poi.text_color.clone(),
            size: poi.size,
            orientation: poi.orientation,
        }
    }

    /// A form seeded from the current live settings, for a new point.
    pub fn from_settings(settings: &LiveSettings) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            height: settings.poi_height,
            background: settings.poi_background.clone(),
            text_color: settings.poi_text_color.clone(),
            size: settings.poi_size,
            orientation: settings.poi_orientation,
        }
    }
}

/// Validated point-of-interest attributes ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiAttributes {
    /// Title shown in the pill.
    pub title: String,
    /// Optional subtitle.
    pub description: Option<String>,
    /// Leader line height.
    pub height: f64,
    /// Pill size.
    pub size: PoiSize,
    /// Pill orientation.
    pub orientation: PoiOrientation,
    /// Pill background color.
    pub background: String,
    /// Pill text color.
    pub text_color: String,
}

/// Validates a point-of-interest form.
pub fn poi_attributes(form: &PoiForm) -> Result<PoiAttributes, ValidationError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField {
            field: "title".to_string(),
        });
    }
    let description = form.description.trim();
    Ok(PoiAttributes {
        title: title.to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        height: form.height,
        size: form.size,
        orientation: form.orientation,
        background: form.background.clone(),
        text_color: form.text_color.clone(),
    })
}

/// Raw operator input from the road settings panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadForm {
    /// Base stroke width.
    pub width: f64,
    /// Stroke color.
    pub color: String,
    /// Line-cap style.
    pub cap: LineCap,
}

/// Merges lot panel edits back into the live settings.
pub fn apply_lot_settings(settings: &mut LiveSettings, stroke_width: f64) {
    settings.lot_stroke_width = stroke_width.max(1.0);
}

/// Merges road panel edits back into the live settings.
pub fn apply_road_settings(settings: &mut LiveSettings, form: &RoadForm) {
    settings.road_width = form.width.max(1.0);
    settings.road_color = form.color.clone();
    settings.road_cap = form.cap;
}

/// Merges point-of-interest panel edits back into the live settings.
pub fn apply_poi_settings(settings: &mut LiveSettings, form: &PoiForm) {
    settings.poi_height = form.height.max(0.0);
    settings.poi_background = form.background.clone();
    settings.poi_text_color = form.text_color.clone();
    settings.poi_size = form.size;
    settings.poi_orientation = form.orientation;
}

/// Strips thousands separators and parses a required numeric field.
fn parse_grouped(raw: &str, field: &str) -> Result<i64, ValidationError> {
    let cleaned: String = raw.chars().filter(|c| *c != '.' && *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    cleaned.parse().map_err(|_| ValidationError::NotNumeric {
        field: field.to_string(),
    })
}

/// Formats an integer with dot thousands separators for display.
fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
