//! # Greedy Marker Clustering
//!
//! Partitions the gyms visible in a viewport into map markers.
//!
//! ## Algorithm
//! 1. Drop points without a valid location, then keep those inside the buffered viewport
//! 2. Hold the pinned point (if visible) aside, it is always drawn on its own
//! 3. Walk the remaining points in input order. Each unprocessed point seeds a cluster
//!    and claims every other unprocessed point within the pixel threshold of the seed
//! 4. Append the pinned marker last
//!
//! Membership is tested against the seed only, never against points that joined the
//! cluster in the same pass. The result is order dependent and not transitive: callers
//! must pass points in a stable order (e.g. sorted by id) to get the same markers on
//! every recompute.
//!
//! ## Thresholds
//! The pixel threshold is a step function of the larger span delta:
//!
//! | span (degrees) | threshold (px) |
//! |----------------|----------------|
//! | > 5.0          | 100            |
//! | > 2.0          | 80             |
//! | > 0.5          | 60             |
//! | otherwise      | 40             |

use std::borrow::Borrow;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::error::{ClusterError, Result};
use crate::geo_utils::compute_center;
use crate::projection::{pixel_distance, PixelPoint, Projection};
use crate::viewport::{filter_visible, PointIndex};
use crate::{ClusterDescriptor, GpsPoint, MapPoint, Span, Viewport};

/// One step of the zoom-dependent threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ThresholdBand {
    /// The band applies when the larger span delta is strictly greater than this.
    pub min_span_degrees: f64,
    /// Merge distance in screen pixels for this band.
    pub pixels: f64,
}

/// Configuration for viewport clustering and zoom-to-fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ClusterConfig {
    /// Margin added around the viewport before clustering (degrees).
    /// Default: 0.1
    pub viewport_buffer_degrees: f64,

    /// Zoomed-out threshold bands. Default: >5.0 → 100px, >2.0 → 80px, >0.5 → 60px
    pub threshold_bands: Vec<ThresholdBand>,

    /// Threshold when no band applies (most zoomed in).
    /// Default: 40px
    pub base_threshold_pixels: f64,

    /// Padding added on each side of a zoom-to-fit region, as a fraction of its extent.
    /// Default: 0.2 (total span becomes 1.4x the raw extent)
    pub region_padding_ratio: f64,

    /// Smallest span a zoom-to-fit region may have on either axis (degrees).
    /// Default: 0.01
    pub min_region_span: f64,

    /// Markers the host should add per batch for large renders.
    /// Default: 100
    pub marker_batch_size: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            viewport_buffer_degrees: 0.1,
            threshold_bands: vec![
                ThresholdBand { min_span_degrees: 5.0, pixels: 100.0 },
                ThresholdBand { min_span_degrees: 2.0, pixels: 80.0 },
                ThresholdBand { min_span_degrees: 0.5, pixels: 60.0 },
            ],
            base_threshold_pixels: 40.0,
            region_padding_ratio: 0.2,
            min_region_span: 0.01,
            marker_batch_size: 100,
        }
    }
}

impl ClusterConfig {
    /// Check that every value is usable.
    ///
    /// Bands must not shrink the threshold as the span grows, otherwise zooming out
    /// could split clusters apart.
    pub fn validate(&self) -> Result<()> {
        fn non_negative(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ClusterError::InvalidConfig(format!("{name} must be finite and >= 0, got {value}")))
            }
        }

        non_negative("viewport_buffer_degrees", self.viewport_buffer_degrees)?;
        non_negative("base_threshold_pixels", self.base_threshold_pixels)?;
        non_negative("region_padding_ratio", self.region_padding_ratio)?;
        non_negative("min_region_span", self.min_region_span)?;

        if self.marker_batch_size == 0 {
            return Err(ClusterError::InvalidConfig("marker_batch_size must be > 0".into()));
        }

        for band in &self.threshold_bands {
            non_negative("threshold band span", band.min_span_degrees)?;
            non_negative("threshold band pixels", band.pixels)?;
            if band.pixels < self.base_threshold_pixels {
                return Err(ClusterError::InvalidConfig(format!(
                    "band above {} degrees uses {}px, below the base threshold",
                    band.min_span_degrees, band.pixels
                )));
            }
        }

        let mut bands = self.threshold_bands.clone();
        bands.sort_by(|a, b| a.min_span_degrees.total_cmp(&b.min_span_degrees));
        if bands.windows(2).any(|w| w[1].pixels < w[0].pixels) {
            return Err(ClusterError::InvalidConfig(
                "threshold bands must not decrease as the span grows".into(),
            ));
        }

        Ok(())
    }
}

/// Pixel merge distance for a viewport span.
///
/// Uses the larger of the two deltas and picks the widest band it exceeds.
///
/// # Example
/// ```
/// use marker_cluster::{ClusterConfig, Span, pixel_threshold};
///
/// let config = ClusterConfig::default();
/// assert_eq!(pixel_threshold(&Span::new(6.0, 1.0), &config), 100.0);
/// assert_eq!(pixel_threshold(&Span::new(0.1, 2.5), &config), 80.0);
/// assert_eq!(pixel_threshold(&Span::new(0.5, 0.5), &config), 40.0);
/// ```
pub fn pixel_threshold(span: &Span, config: &ClusterConfig) -> f64 {
    let span = span.max_delta();
    config
        .threshold_bands
        .iter()
        .filter(|band| span > band.min_span_degrees)
        .max_by(|a, b| a.min_span_degrees.total_cmp(&b.min_span_degrees))
        .map_or(config.base_threshold_pixels, |band| band.pixels)
}

/// Visible points with the pinned point held aside.
#[derive(Debug, Clone, Default)]
pub struct PinnedSplit<'a> {
    pub pinned: Option<&'a MapPoint>,
    pub rest: Vec<&'a MapPoint>,
}

/// Remove the pinned point from the visible set.
///
/// A pinned id that is not in `points` (scrolled out of view) yields no pinned point;
/// pinning never forces a gym onto the map.
pub fn split_pinned<'a>(points: Vec<&'a MapPoint>, pinned_id: Option<&str>) -> PinnedSplit<'a> {
    let Some(pinned_id) = pinned_id else {
        return PinnedSplit { pinned: None, rest: points };
    };

    let mut split = PinnedSplit { pinned: None, rest: Vec::with_capacity(points.len()) };
    for point in points {
        if point.id == pinned_id {
            split.pinned.get_or_insert(point);
        } else {
            split.rest.push(point);
        }
    }
    split
}

/// Marker for the pinned point, or `None` if it has no valid location.
pub fn pinned_descriptor(point: &MapPoint) -> Option<ClusterDescriptor> {
    let location = point.location()?;
    Some(ClusterDescriptor::pinned(point, location))
}

/// Greedy seed-based clustering of already filtered, non-pinned points.
///
/// Each point is projected once. A seed claims every later unprocessed point whose
/// pixel distance from the seed is `<=` the threshold for the viewport span.
///
/// # Example
/// ```
/// use marker_cluster::{
///     ClusterConfig, GpsPoint, LinearProjection, MapPoint, Span, Viewport, cluster_points,
/// };
///
/// let viewport = Viewport::new(GpsPoint::new(51.5, -0.1), Span::new(0.1, 0.1));
/// let projection = LinearProjection::new(1000.0, 1000.0);
/// let gyms = vec![
///     MapPoint::new("a", 51.500, -0.100),
///     MapPoint::new("b", 51.501, -0.100), // 10px from a
///     MapPoint::new("c", 51.530, -0.100), // 300px from a
/// ];
///
/// let clusters = cluster_points(&gyms, &projection, &viewport, &ClusterConfig::default());
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0].count, 2);
/// assert_eq!(clusters[1].count, 1);
/// ```
pub fn cluster_points<T, P>(
    points: &[T],
    projection: &P,
    viewport: &Viewport,
    config: &ClusterConfig,
) -> Vec<ClusterDescriptor>
where
    T: Borrow<MapPoint>,
    P: Projection + ?Sized,
{
    let threshold = pixel_threshold(&viewport.span, config);

    let located: Vec<(&MapPoint, GpsPoint, PixelPoint)> = points
        .iter()
        .filter_map(|p| {
            let point = p.borrow();
            let location = point.location()?;
            Some((point, location, projection.project(location, viewport)))
        })
        .collect();

    let mut processed = vec![false; located.len()];
    let mut clusters = Vec::new();

    for seed in 0..located.len() {
        if processed[seed] {
            continue;
        }
        processed[seed] = true;

        let seed_px = located[seed].2;
        let mut members = vec![seed];

        // Everything before the seed has already been processed
        for other in (seed + 1)..located.len() {
            if processed[other] {
                continue;
            }
            if pixel_distance(seed_px, located[other].2) <= threshold {
                processed[other] = true;
                members.push(other);
            }
        }

        clusters.push(build_descriptor(&located, &members));
    }

    clusters
}

fn build_descriptor(located: &[(&MapPoint, GpsPoint, PixelPoint)], members: &[usize]) -> ClusterDescriptor {
    let (seed_point, seed_location, _) = located[members[0]];
    if members.len() == 1 {
        return ClusterDescriptor::single(seed_point, seed_location);
    }

    let locations: Vec<GpsPoint> = members.iter().map(|&i| located[i].1).collect();
    let coordinate = compute_center(&locations).unwrap_or(seed_location);
    let member_ids = members.iter().map(|&i| located[i].0.id.clone()).collect();

    ClusterDescriptor::group(coordinate, member_ids)
}

/// Full recompute for a viewport: filter, split the pinned point, cluster, append the
/// pinned marker.
///
/// Stateless and deterministic: identical inputs (including point order) give
/// identical output.
///
/// # Example
/// ```
/// use marker_cluster::{ClusterConfig, GpsPoint, LinearProjection, MapPoint, Span, Viewport, recompute};
///
/// let viewport = Viewport::new(GpsPoint::new(51.5, -0.1), Span::new(0.1, 0.1));
/// let projection = LinearProjection::new(1000.0, 1000.0);
/// let gyms = vec![
///     MapPoint::new("a", 51.500, -0.100),
///     MapPoint::new("b", 51.501, -0.100),
/// ];
///
/// let markers = recompute(&gyms, &viewport, Some("b"), &projection, &ClusterConfig::default());
/// assert_eq!(markers.len(), 2);
/// assert!(!markers[0].is_pinned);
/// assert!(markers[1].is_pinned);
/// ```
pub fn recompute<P: Projection + ?Sized>(
    points: &[MapPoint],
    viewport: &Viewport,
    pinned_id: Option<&str>,
    projection: &P,
    config: &ClusterConfig,
) -> Vec<ClusterDescriptor> {
    let visible = filter_visible(points, viewport, config.viewport_buffer_degrees);
    recompute_visible(points.len(), visible, pinned_id, projection, viewport, config)
}

/// Same as [`recompute`], answering the viewport query from a prebuilt [`PointIndex`].
pub fn recompute_indexed<P: Projection + ?Sized>(
    index: &PointIndex,
    viewport: &Viewport,
    pinned_id: Option<&str>,
    projection: &P,
    config: &ClusterConfig,
) -> Vec<ClusterDescriptor> {
    let visible = index.visible(viewport, config.viewport_buffer_degrees);
    recompute_visible(index.points().len(), visible, pinned_id, projection, viewport, config)
}

fn recompute_visible<P: Projection + ?Sized>(
    total: usize,
    visible: Vec<&MapPoint>,
    pinned_id: Option<&str>,
    projection: &P,
    viewport: &Viewport,
    config: &ClusterConfig,
) -> Vec<ClusterDescriptor> {
    let visible_count = visible.len();
    let split = split_pinned(visible, pinned_id);

    let mut descriptors = cluster_points(&split.rest, projection, viewport, config);
    if let Some(pinned) = split.pinned.and_then(pinned_descriptor) {
        descriptors.push(pinned);
    }

    debug!(
        "[Clustering] {} points, {} visible -> {} markers (pinned: {})",
        total,
        visible_count,
        descriptors.len(),
        split.pinned.is_some()
    );

    descriptors
}
