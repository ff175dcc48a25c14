//! Zoom-to-fit for tapped clusters.
//!
//! Tapping a multi-gym marker re-centres the map on a region that shows every member
//! individually: the members' bounding box, padded on each side and never smaller than
//! a minimum span so coincident gyms don't zoom to an unusable scale.
//!
//! An earlier tap behaviour simply halved the viewport span around the marker. It is
//! kept as [`zoom_in_region`], a fallback for callers when zoom-to-fit has nothing to
//! fit.

use std::collections::HashSet;
use crate::clustering::ClusterConfig;
use crate::error::{ClusterError, Result};
use crate::geo_utils::compute_bounds;
use crate::{ClusterDescriptor, GpsPoint, MapPoint, Span, Viewport};

/// Padded bounding region for a set of member locations.
///
/// Invalid locations are ignored. With no valid location left this returns
/// [`ClusterError::EmptyRegion`] and the caller should leave the viewport unchanged.
///
/// # Example
/// ```
/// use marker_cluster::{ClusterConfig, GpsPoint, bounding_region};
///
/// let members = vec![
///     GpsPoint::new(51.50, -0.10),
///     GpsPoint::new(51.52, -0.12),
///     GpsPoint::new(51.48, -0.08),
/// ];
///
/// let region = bounding_region(&members, &ClusterConfig::default()).unwrap();
/// assert!((region.center.latitude - 51.50).abs() < 1e-9);
/// assert!((region.span.latitude_delta - 0.056).abs() < 1e-9);
///
/// assert!(bounding_region(&[], &ClusterConfig::default()).is_err());
/// ```
pub fn bounding_region(points: &[GpsPoint], config: &ClusterConfig) -> Result<Viewport> {
    let located: Vec<GpsPoint> = points.iter().copied().filter(GpsPoint::is_valid).collect();
    let bounds = compute_bounds(&located).ok_or(ClusterError::EmptyRegion)?;

    let padding = 1.0 + 2.0 * config.region_padding_ratio;
    let lat_delta = (bounds.max_lat - bounds.min_lat) * padding;
    let lng_delta = (bounds.max_lng - bounds.min_lng) * padding;

    Ok(Viewport {
        center: bounds.center(),
        span: Span::new(
            lat_delta.max(config.min_region_span),
            lng_delta.max(config.min_region_span),
        ),
    })
}

/// Zoom-to-fit for a tapped marker, resolving its member ids against `points`.
///
/// Members that are missing from `points` or have no valid location are skipped.
pub fn region_for_cluster(
    descriptor: &ClusterDescriptor,
    points: &[MapPoint],
    config: &ClusterConfig,
) -> Result<Viewport> {
    let members: HashSet<&str> = descriptor.member_ids.iter().map(String::as_str).collect();
    let locations: Vec<GpsPoint> = points
        .iter()
        .filter(|p| members.contains(p.id.as_str()))
        .filter_map(MapPoint::location)
        .collect();

    bounding_region(&locations, config)
}

/// Halve the current span around `center`, clamped to the minimum region span.
pub fn zoom_in_region(center: GpsPoint, viewport: &Viewport, config: &ClusterConfig) -> Viewport {
    Viewport {
        center,
        span: Span::new(
            (viewport.span.latitude_delta / 2.0).max(config.min_region_span),
            (viewport.span.longitude_delta / 2.0).max(config.min_region_span),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_bounding_region_known_members() {
        let members = vec![
            GpsPoint::new(51.50, -0.10),
            GpsPoint::new(51.52, -0.12),
            GpsPoint::new(51.48, -0.08),
        ];
        let region = bounding_region(&members, &ClusterConfig::default()).unwrap();

        assert!(approx_eq(region.center.latitude, 51.50, 1e-9));
        assert!(approx_eq(region.center.longitude, -0.10, 1e-9));
        assert!(approx_eq(region.span.latitude_delta, 0.056, 1e-9));
        assert!(approx_eq(region.span.longitude_delta, 0.056, 1e-9));
    }

    #[test]
    fn test_bounding_region_empty_is_reported() {
        let result = bounding_region(&[], &ClusterConfig::default());
        assert_eq!(result, Err(ClusterError::EmptyRegion));
    }

    #[test]
    fn test_bounding_region_ignores_invalid() {
        let result = bounding_region(&[GpsPoint::new(f64::NAN, 0.0), GpsPoint::new(95.0, 0.0)], &ClusterConfig::default());
        assert_eq!(result, Err(ClusterError::EmptyRegion));

        let region = bounding_region(
            &[GpsPoint::new(95.0, 0.0), GpsPoint::new(10.0, 20.0)],
            &ClusterConfig::default(),
        )
        .unwrap();
        assert_eq!(region.center, GpsPoint::new(10.0, 20.0));
    }

    #[test]
    fn test_coincident_members_use_minimum_span() {
        let members = vec![GpsPoint::new(40.7, -74.0); 4];
        let region = bounding_region(&members, &ClusterConfig::default()).unwrap();

        assert_eq!(region.center, GpsPoint::new(40.7, -74.0));
        assert_eq!(region.span, Span::new(0.01, 0.01));
        assert!(region.span.latitude_delta.is_finite());
    }

    #[test]
    fn test_minimum_span_applies_per_axis() {
        // Tall, thin cluster: latitude padded normally, longitude clamped
        let members = vec![GpsPoint::new(10.0, 20.0), GpsPoint::new(10.1, 20.001)];
        let region = bounding_region(&members, &ClusterConfig::default()).unwrap();

        assert!(approx_eq(region.span.latitude_delta, 0.14, 1e-9));
        assert_eq!(region.span.longitude_delta, 0.01);
    }

    #[test]
    fn test_region_for_cluster_resolves_members() {
        let points = vec![
            MapPoint::new("a", 51.50, -0.10),
            MapPoint::new("b", 51.52, -0.12),
            MapPoint::new("c", 51.48, -0.08),
            MapPoint::new("not-a-member", 10.0, 10.0),
        ];
        let descriptor = ClusterDescriptor::group(
            GpsPoint::new(51.5, -0.1),
            vec!["a".into(), "b".into(), "c".into()],
        );

        let region = region_for_cluster(&descriptor, &points, &ClusterConfig::default()).unwrap();
        assert!(approx_eq(region.center.latitude, 51.50, 1e-9));
        assert!(approx_eq(region.span.longitude_delta, 0.056, 1e-9));
    }

    #[test]
    fn test_region_for_cluster_without_located_members() {
        let mut unlocated = MapPoint::new("a", 0.0, 0.0);
        unlocated.latitude = None;
        let descriptor = ClusterDescriptor::group(GpsPoint::new(0.0, 0.0), vec!["a".into(), "gone".into()]);

        let result = region_for_cluster(&descriptor, &[unlocated], &ClusterConfig::default());
        assert_eq!(result, Err(ClusterError::EmptyRegion));
    }

    #[test]
    fn test_zoom_in_region_halves_span() {
        let viewport = Viewport::new(GpsPoint::new(0.0, 0.0), Span::new(1.0, 0.015));
        let region = zoom_in_region(GpsPoint::new(1.0, 2.0), &viewport, &ClusterConfig::default());

        assert_eq!(region.center, GpsPoint::new(1.0, 2.0));
        assert_eq!(region.span.latitude_delta, 0.5);
        assert_eq!(region.span.longitude_delta, 0.01);
    }
}
