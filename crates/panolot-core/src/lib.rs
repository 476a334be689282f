//! # Panolot Core
//!
//! Core types and utilities for the panolot annotation engine.
//! Provides the spherical geometry primitives, the persisted domain model
//! (lots, roads, points of interest), the operator-editable live settings,
//! and the error taxonomy shared by every layer.

pub mod error;
pub mod geo;
pub mod model;
pub mod settings;

pub use error::{AuthError, Error, RenderError, Result, TransportError, ValidationError};
pub use geo::{
    badge_text_scale, lot_scale, polygon_centroid, road_scale, SphericalPoint, MIN_LOT_STROKE,
    MIN_ROAD_STROKE,
};
pub use model::{
    Entity, EntityId, EntityKind, LineCap, Lot, LotStatus, Poi, PoiOrientation, PoiSize, ProjectId,
    Road,
};
pub use settings::LiveSettings;
