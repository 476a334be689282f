//! Wire records and payloads for the persistence backend.
//!
//! The backend stores every annotation in one table; the record shape is
//! stable and must round-trip. Field names on the wire are the backend's
//! (Spanish) column names; serde renames keep the Rust side readable.
//! Geometry arrives as `poligono_json`, which may be a JSON string or
//! inline JSON, and whose shape depends on the entity kind:
//!
//! - lot: `[[yaw, pitch], …]`
//! - road: `{ "path": [[yaw, pitch], …], "cap": "round" | "square" }`
//! - poi: `{ "yaw", "pitch", "height", "bg", "text", "size", "orient" }`
//!
//! Decoding is deliberately forgiving: numbers may arrive as strings and
//! unknown codes fall back to defaults, because one corrupt record must
//! never blank the whole viewer.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use panolot_core::{
    Entity, EntityId, LineCap, Lot, LotStatus, Poi, PoiOrientation, PoiSize, ProjectId,
    RenderError, Road, SphericalPoint,
};

/// Entity kind tag as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireKind {
    /// Real-estate lot.
    #[serde(rename = "lote")]
    Lot,
    /// Road polyline.
    #[serde(rename = "camino")]
    Road,
    /// Point of interest.
    #[serde(rename = "poi")]
    Poi,
}

/// A persisted annotation record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Row id.
    pub id: EntityId,
    /// Owning project.
    #[serde(rename = "proyecto_id")]
    pub project_id: ProjectId,
    /// Entity kind tag.
    #[serde(rename = "tipo")]
    pub kind: WireKind,
    /// Lot number, or the fixed label roads are stored under.
    #[serde(rename = "numero_lote", default)]
    pub number: Option<String>,
    /// Point-of-interest title.
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    /// Point-of-interest description.
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    /// Lot status code (1/2/3).
    #[serde(rename = "estado_id", default)]
    pub status: Option<Value>,
    /// Lot price.
    #[serde(rename = "precio", default)]
    pub price: Option<Value>,
    /// Lot area, or road base width. Numbers may arrive as strings.
    #[serde(rename = "superficie", default)]
    pub surface: Option<Value>,
    /// Road color, or a lot's stroke width stored as a string.
    #[serde(rename = "color_hex", default)]
    pub stroke_or_color: Option<Value>,
    /// JSON-encoded geometry (string or inline JSON).
    #[serde(rename = "poligono_json")]
    pub geometry: Value,
}

impl ElementRecord {
    /// Decodes the record into a domain entity.
    ///
    /// Fails with [`RenderError`] when the geometry cannot be made sense
    /// of; callers are expected to log and skip rather than abort.
    pub fn decode(&self) -> Result<Entity, RenderError> {
        let geometry = inline_geometry(self.id, &self.geometry)?;
        match self.kind {
            WireKind::Lot => self.decode_lot(&geometry).map(Entity::Lot),
            WireKind::Road => self.decode_road(&geometry).map(Entity::Road),
            WireKind::Poi => self.decode_poi(&geometry).map(Entity::Poi),
        }
    }

    fn decode_lot(&self, geometry: &Value) -> Result<Lot, RenderError> {
        let polygon = points_from(self.id, geometry)?;
        Ok(Lot {
            id: self.id,
            number: self.number.clone().unwrap_or_default(),
            status: LotStatus::from_code(
                self.status.as_ref().and_then(value_to_i64).unwrap_or(1) as i32,
            ),
            price: self.price.as_ref().and_then(value_to_i64).unwrap_or(0),
            area: self.surface.as_ref().and_then(value_to_i64).unwrap_or(0),
            stroke_width: self
                .stroke_or_color
                .as_ref()
                .and_then(value_to_f64)
                .unwrap_or(4.0),
            polygon,
        })
    }

    fn decode_road(&self, geometry: &Value) -> Result<Road, RenderError> {
        let path = match geometry.get("path") {
            Some(path) => points_from(self.id, path)?,
            None => points_from(self.id, geometry)?,
        };
        let cap = geometry
            .get("cap")
            .and_then(Value::as_str)
            .map(|c| match c {
                "square" => LineCap::Square,
                _ => LineCap::Round,
            })
            .unwrap_or_default();
        Ok(Road {
            id: self.id,
            path,
            width: self.surface.as_ref().and_then(value_to_f64).unwrap_or(15.0),
            color: self
                .stroke_or_color
                .as_ref()
                .and_then(value_to_string)
                .unwrap_or_else(|| "#ffffff".to_string()),
            cap,
        })
    }

    fn decode_poi(&self, geometry: &Value) -> Result<Poi, RenderError> {
        // Older records stored a bare [yaw, pitch] pair.
        let anchor = if geometry.is_array() {
            let points = points_from(self.id, geometry)?;
            *points.first().ok_or_else(|| RenderError::MalformedGeometry {
                entity_id: self.id,
                reason: "empty point list".to_string(),
            })?
        } else {
            let yaw = geometry.get("yaw").and_then(value_to_f64);
            let pitch = geometry.get("pitch").and_then(value_to_f64);
            match (yaw, pitch) {
                (Some(yaw), Some(pitch)) => SphericalPoint::new(yaw, pitch),
                _ => {
                    return Err(RenderError::MalformedGeometry {
                        entity_id: self.id,
                        reason: "missing yaw/pitch".to_string(),
                    })
                }
            }
        };
        Ok(Poi {
            id: self.id,
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().filter(|d| !d.is_empty()),
            anchor,
            height: geometry
                .get("height")
                .and_then(value_to_f64)
                .unwrap_or(100.0),
            size: PoiSize::from_code(
                geometry.get("size").and_then(value_to_i64).unwrap_or(2) as i32
            ),
            orientation: geometry
                .get("orient")
                .and_then(Value::as_str)
                .map(|o| match o {
                    "left" => PoiOrientation::Left,
                    _ => PoiOrientation::Right,
                })
                .unwrap_or_default(),
            background: geometry
                .get("bg")
                .and_then(value_to_string)
                .unwrap_or_else(|| "#ef4444".to_string()),
            text_color: geometry
                .get("text")
                .and_then(value_to_string)
                .unwrap_or_else(|| "#ffffff".to_string()),
        })
    }
}

/// Payload sent to the backend on create and update.
///
/// Mirrors the record shape except for the stroke/color field, which the
/// backend accepts as `color` on writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementPayload {
    /// Owning project.
    #[serde(rename = "proyecto_id")]
    pub project_id: ProjectId,
    /// Entity kind tag.
    #[serde(rename = "tipo")]
    pub kind: WireKind,
    /// Lot number or road label.
    #[serde(rename = "numero_lote", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Point-of-interest title.
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Point-of-interest description.
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lot status code.
    #[serde(rename = "estado_id", skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    /// Lot price.
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    /// Lot area or road base width.
    #[serde(rename = "superficie", skip_serializing_if = "Option::is_none")]
    pub surface: Option<i64>,
    /// Stroke width (lots, stringified) or color (roads).
    #[serde(rename = "color", skip_serializing_if = "Option::is_none")]
    pub stroke_or_color: Option<String>,
    /// Geometry in the kind-specific shape.
    #[serde(rename = "poligono_json")]
    pub geometry: Value,
}

impl ElementPayload {
    /// Payload for a lot.
    pub fn lot(
        project_id: ProjectId,
        number: &str,
        status: LotStatus,
        price: i64,
        area: i64,
        stroke_width: f64,
        polygon: &[SphericalPoint],
    ) -> Self {
        Self {
            project_id,
            kind: WireKind::Lot,
            number: Some(number.to_string()),
            title: None,
            description: None,
            status: Some(status.code()),
            price: Some(price),
            surface: Some(area),
            stroke_or_color: Some((stroke_width as i64).to_string()),
            geometry: json!(polygon),
        }
    }

    /// Payload for a road. Roads are stored under a fixed label.
    pub fn road(
        project_id: ProjectId,
        width: f64,
        color: &str,
        cap: LineCap,
        path: &[SphericalPoint],
    ) -> Self {
        Self {
            project_id,
            kind: WireKind::Road,
            number: Some("Camino".to_string()),
            title: None,
            description: None,
            status: None,
            price: None,
            surface: Some(width as i64),
            stroke_or_color: Some(color.to_string()),
            geometry: json!({ "path": path, "cap": cap }),
        }
    }

    /// Payload for a point of interest.
    pub fn poi(
        project_id: ProjectId,
        title: &str,
        description: Option<&str>,
        anchor: SphericalPoint,
        height: f64,
        size: PoiSize,
        orientation: PoiOrientation,
        background: &str,
        text_color: &str,
    ) -> Self {
        Self {
            project_id,
            kind: WireKind::Poi,
            number: None,
            title: Some(title.to_string()),
            description: description.map(str::to_string),
            status: None,
            price: None,
            surface: None,
            stroke_or_color: None,
            geometry: json!({
                "yaw": anchor.yaw,
                "pitch": anchor.pitch,
                "height": height,
                "bg": background,
                "text": text_color,
                "size": size.code(),
                "orient": orientation.as_class(),
            }),
        }
    }
}

/// Resolves `poligono_json` to inline JSON, parsing an inner string form.
fn inline_geometry(entity_id: EntityId, raw: &Value) -> Result<Value, RenderError> {
    match raw {
        Value::String(s) => {
            serde_json::from_str(s).map_err(|e| RenderError::MalformedGeometry {
                entity_id,
                reason: e.to_string(),
            })
        }
        other => Ok(other.clone()),
    }
}

/// Reads an array of `[yaw, pitch]` pairs.
fn points_from(entity_id: EntityId, value: &Value) -> Result<Vec<SphericalPoint>, RenderError> {
    serde_json::from_value(value.clone()).map_err(|e| RenderError::MalformedGeometry {
        entity_id,
        reason: e.to_string(),
    })
}

fn value_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
