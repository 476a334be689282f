//! Spherical geometry for panorama annotations.
//!
//! Points on the panorama sphere are addressed by yaw (azimuth) and pitch
//! (elevation), both in radians. Polygons and polylines are ordered point
//! sequences; order defines the edges.

use serde::{Deserialize, Serialize};

/// Minimum rendered stroke width for lot polygons, in pixels.
pub const MIN_LOT_STROKE: f64 = 2.0;

/// Minimum rendered stroke width for road polylines, in pixels.
pub const MIN_ROAD_STROKE: f64 = 3.0;

/// A point on the panorama sphere.
///
/// Serialized as a two-element array `[yaw, pitch]`, the form the backend
/// stores inside geometry JSON.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalPoint {
    /// Azimuth angle in radians.
    pub yaw: f64,
    /// Elevation angle in radians.
    pub pitch: f64,
}

impl SphericalPoint {
    /// Creates a new spherical point.
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Converts to a unit direction vector `(x, y, z)`.
    pub fn to_unit_vector(&self) -> (f64, f64, f64) {
        (
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        )
    }
}

// The backend encodes points as bare `[yaw, pitch]` pairs.
impl Serialize for SphericalPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        [self.yaw, self.pitch].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SphericalPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let pair = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Self::new(pair[0], pair[1]))
    }
}

/// Computes the visual center of a spherical polygon.
///
/// Each vertex is converted to a unit 3-D direction, the directions are
/// averaged component-wise and the mean is renormalized via `atan2`. This is
/// a vector-mean approximation rather than an exact spherical centroid,
/// which is acceptable for the convex, small-angular-extent polygons lots
/// are drawn as. Returns `None` for an empty input.
pub fn polygon_centroid(points: &[SphericalPoint]) -> Option<SphericalPoint> {
    if points.is_empty() {
        return None;
    }
    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for p in points {
        let (px, py, pz) = p.to_unit_vector();
        x += px;
        y += py;
        z += pz;
    }
    let n = points.len() as f64;
    x /= n;
    y /= n;
    z /= n;
    Some(SphericalPoint::new(
        z.atan2(x),
        y.atan2((x * x + z * z).sqrt()),
    ))
}

/// Stroke scale for road polylines at a given zoom percentage (0–100).
///
/// Monotonic over `[0, 100]`, bounded in `[0.3, 0.8]`.
pub fn road_scale(zoom: f64) -> f64 {
    0.3 + 0.5 * (zoom / 100.0)
}

/// Stroke scale for lot polygons at a given zoom percentage (0–100).
///
/// Monotonic over `[0, 100]`, bounded in `[0.6, 1.0]`.
pub fn lot_scale(zoom: f64) -> f64 {
    0.6 + 0.4 * (zoom / 100.0)
}

/// Text scale for lot number badges at a given zoom percentage (0–100).
///
/// Monotonic over `[0, 100]`, bounded in `[0.7, 1.0]`.
pub fn badge_text_scale(zoom: f64) -> f64 {
    0.7 + 0.3 * (zoom / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn centroid_of_empty_polygon_is_none() {
        assert!(polygon_centroid(&[]).is_none());
    }

    #[test]
    fn centroid_of_single_point_is_that_point() {
        let p = SphericalPoint::new(0.3, -0.2);
        let c = polygon_centroid(&[p]).unwrap();
        assert!((c.yaw - p.yaw).abs() < EPS);
        assert!((c.pitch - p.pitch).abs() < EPS);
    }

    #[test]
    fn centroid_of_regular_polygon_is_its_center() {
        // Regular octagon on a small circle around (0.5, 0.25).
        let (yaw0, pitch0) = (0.5, 0.25);
        let r = 0.01;
        let points: Vec<SphericalPoint> = (0..8)
            .map(|i| {
                let a = std::f64::consts::TAU * (i as f64) / 8.0;
                SphericalPoint::new(yaw0 + r * a.cos(), pitch0 + r * a.sin())
            })
            .collect();
        let c = polygon_centroid(&points).unwrap();
        assert!((c.yaw - yaw0).abs() < 1e-4, "yaw {} vs {}", c.yaw, yaw0);
        assert!((c.pitch - pitch0).abs() < 1e-4);
    }

    #[test]
    fn centroid_of_square_near_origin() {
        let points = [
            SphericalPoint::new(0.0, 0.0),
            SphericalPoint::new(0.1, 0.0),
            SphericalPoint::new(0.1, 0.1),
            SphericalPoint::new(0.0, 0.1),
        ];
        let c = polygon_centroid(&points).unwrap();
        assert!((c.yaw - 0.05).abs() < 1e-3);
        assert!((c.pitch - 0.05).abs() < 1e-3);
    }

    #[test]
    fn scale_curve_bounds() {
        assert!((road_scale(0.0) - 0.3).abs() < EPS);
        assert!((road_scale(100.0) - 0.8).abs() < EPS);
        assert!((lot_scale(0.0) - 0.6).abs() < EPS);
        assert!((lot_scale(100.0) - 1.0).abs() < EPS);
        assert!((badge_text_scale(0.0) - 0.7).abs() < EPS);
        assert!((badge_text_scale(100.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn point_serde_round_trips_as_pair() {
        let p = SphericalPoint::new(1.25, -0.5);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1.25,-0.5]");
        let back: SphericalPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    proptest! {
        #[test]
        fn scale_curves_are_monotonic_and_bounded(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(road_scale(lo) <= road_scale(hi));
            prop_assert!(lot_scale(lo) <= lot_scale(hi));
            prop_assert!((0.3..=0.8).contains(&road_scale(a)));
            prop_assert!((0.6..=1.0).contains(&lot_scale(a)));
            prop_assert!((0.7..=1.0).contains(&badge_text_scale(a)));
        }
    }
}
