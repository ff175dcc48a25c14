//! # Geographic Utilities
//!
//! Small geographic helpers shared by the viewport filter, the clustering pass and
//! zoom-to-fit.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`compute_bounds`] | Bounding box of a set of points |
//! | [`compute_center`] | Arithmetic mean of a set of points |
//! | [`bounds_contains`] | Inclusive point-in-box test |
//!
//! ## Example
//!
//! ```rust
//! use marker_cluster::{GpsPoint, geo_utils};
//!
//! let gyms = vec![
//!     GpsPoint::new(51.5074, -0.1278),
//!     GpsPoint::new(51.5080, -0.1290),
//!     GpsPoint::new(51.5090, -0.1300),
//! ];
//!
//! let bounds = geo_utils::compute_bounds(&gyms).unwrap();
//! println!("Bounds: {:.4}N to {:.4}N", bounds.min_lat, bounds.max_lat);
//!
//! let center = geo_utils::compute_center(&gyms).unwrap();
//! println!("Center: {:.4}, {:.4}", center.latitude, center.longitude);
//! ```
//!
//! ## Coordinate System
//!
//! All functions take WGS84 latitude/longitude in degrees and treat them as planar.
//! That is only adequate for the small spans a map viewport covers; nothing here is
//! geodesically correct across the antimeridian or near the poles.

use geo::{BoundingRect, Centroid, MultiPoint, Point};
use crate::{Bounds, GpsPoint};

fn to_multi_point(points: &[GpsPoint]) -> MultiPoint<f64> {
    points
        .iter()
        .map(|p| Point::new(p.longitude, p.latitude))
        .collect()
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Compute the bounding box of a set of points.
///
/// Returns `None` for empty input rather than a box made of `f64::MIN`/`f64::MAX`
/// sentinels, so callers can never derive a nonsensical region from it.
///
/// # Example
///
/// ```rust
/// use marker_cluster::{GpsPoint, geo_utils};
///
/// let points = vec![
///     GpsPoint::new(51.5000, -0.1300),
///     GpsPoint::new(51.5100, -0.1200),
///     GpsPoint::new(51.5050, -0.1250),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&points).unwrap();
/// assert_eq!(bounds.min_lat, 51.5000);
/// assert_eq!(bounds.max_lat, 51.5100);
/// assert_eq!(bounds.min_lng, -0.1300);
/// assert_eq!(bounds.max_lng, -0.1200);
///
/// assert!(geo_utils::compute_bounds(&[]).is_none());
/// ```
pub fn compute_bounds(points: &[GpsPoint]) -> Option<Bounds> {
    let rect = to_multi_point(points).bounding_rect()?;
    Some(Bounds {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lng: rect.min().x,
        max_lng: rect.max().x,
    })
}

/// Inclusive containment test: points exactly on an edge are inside.
#[inline]
pub fn bounds_contains(bounds: &Bounds, point: &GpsPoint) -> bool {
    point.latitude >= bounds.min_lat
        && point.latitude <= bounds.max_lat
        && point.longitude >= bounds.min_lng
        && point.longitude <= bounds.max_lng
}

// =============================================================================
// Center Functions
// =============================================================================

/// Compute the arithmetic mean of a set of points.
///
/// This is the naive average of latitudes and longitudes, not a centroid on the
/// sphere. Cluster markers use it because clusters only ever span a viewport.
///
/// Returns `None` for empty input.
///
/// # Example
///
/// ```rust
/// use marker_cluster::{GpsPoint, geo_utils};
///
/// let points = vec![
///     GpsPoint::new(51.50, -0.10),
///     GpsPoint::new(51.52, -0.12),
/// ];
///
/// let center = geo_utils::compute_center(&points).unwrap();
/// assert!((center.latitude - 51.51).abs() < 0.001);
/// assert!((center.longitude - (-0.11)).abs() < 0.001);
/// ```
pub fn compute_center(points: &[GpsPoint]) -> Option<GpsPoint> {
    let centroid = to_multi_point(points).centroid()?;
    Some(GpsPoint::new(centroid.y(), centroid.x()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_compute_bounds() {
        let points = vec![
            GpsPoint::new(51.50, -0.13),
            GpsPoint::new(51.51, -0.12),
            GpsPoint::new(51.505, -0.125),
        ];
        let bounds = compute_bounds(&points).unwrap();
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lat, 51.51);
        assert_eq!(bounds.min_lng, -0.13);
        assert_eq!(bounds.max_lng, -0.12);
    }

    #[test]
    fn test_compute_bounds_single_point() {
        let bounds = compute_bounds(&[GpsPoint::new(40.0, -74.0)]).unwrap();
        assert_eq!(bounds.min_lat, bounds.max_lat);
        assert_eq!(bounds.min_lng, bounds.max_lng);
    }

    #[test]
    fn test_compute_bounds_empty() {
        assert!(compute_bounds(&[]).is_none());
    }

    #[test]
    fn test_compute_center() {
        let points = vec![
            GpsPoint::new(51.50, -0.10),
            GpsPoint::new(51.52, -0.12),
            GpsPoint::new(51.54, -0.14),
        ];
        let center = compute_center(&points).unwrap();
        assert!(approx_eq(center.latitude, 51.52, 1e-9));
        assert!(approx_eq(center.longitude, -0.12, 1e-9));
    }

    #[test]
    fn test_compute_center_empty() {
        assert!(compute_center(&[]).is_none());
    }

    #[test]
    fn test_bounds_contains_is_inclusive() {
        let b = Bounds { min_lat: 1.0, max_lat: 2.0, min_lng: 3.0, max_lng: 4.0 };
        assert!(bounds_contains(&b, &GpsPoint::new(1.0, 3.0)));
        assert!(bounds_contains(&b, &GpsPoint::new(2.0, 4.0)));
        assert!(bounds_contains(&b, &GpsPoint::new(1.5, 3.5)));
        assert!(!bounds_contains(&b, &GpsPoint::new(2.0001, 3.5)));
        assert!(!bounds_contains(&b, &GpsPoint::new(1.5, 2.9999)));
    }
}
