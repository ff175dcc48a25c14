//! Viewport filtering.
//!
//! Greedy clustering is quadratic in the number of points, so the point set is first
//! restricted to what the viewport shows plus a buffer margin. The margin keeps clusters
//! at the screen edge from popping in and out while the user pans.
//!
//! Two entry points produce the same result:
//! - [`filter_visible`] scans the slice once per call.
//! - [`PointIndex`] bulk-loads an R-tree once so a caller that keeps the same gyms
//!   across many pans can query each viewport without a linear scan.
//!
//! Both preserve input order, which the greedy clustering depends on.

use rstar::{RTree, RTreeObject, AABB};
use crate::geo_utils::bounds_contains;
use crate::{MapPoint, Viewport};

/// Inputs smaller than this are always filtered sequentially.
#[cfg(feature = "parallel")]
const PARALLEL_FILTER_MIN_POINTS: usize = 2048;

/// Keep the points whose location falls inside `center ± span/2 ± buffer` on both
/// axes. Bounds are inclusive. Points without a valid location are dropped.
///
/// # Example
///
/// ```rust
/// use marker_cluster::{GpsPoint, MapPoint, Span, Viewport, filter_visible};
///
/// let viewport = Viewport::new(GpsPoint::new(51.5, -0.1), Span::new(0.2, 0.2));
/// let gyms = vec![
///     MapPoint::new("inside", 51.55, -0.05),
///     MapPoint::new("buffer", 51.65, -0.1),
///     MapPoint::new("outside", 52.0, -0.1),
/// ];
///
/// let visible = filter_visible(&gyms, &viewport, 0.1);
/// let ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
/// assert_eq!(ids, vec!["inside", "buffer"]);
/// ```
pub fn filter_visible<'a>(points: &'a [MapPoint], viewport: &Viewport, buffer: f64) -> Vec<&'a MapPoint> {
    let bounds = viewport.bounds(buffer);
    let is_visible = |p: &&'a MapPoint| {
        p.location()
            .is_some_and(|location| bounds_contains(&bounds, &location))
    };

    #[cfg(feature = "parallel")]
    {
        if points.len() >= PARALLEL_FILTER_MIN_POINTS {
            use rayon::prelude::*;
            // collect() on rayon keeps the original order
            return points.par_iter().filter(is_visible).collect();
        }
    }

    points.iter().filter(is_visible).collect()
}

/// A located point with its position in the indexed set.
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    idx: usize,
    lat: f64,
    lng: f64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lng])
    }
}

/// R-tree over a fixed point set, for repeated viewport queries.
///
/// Points without a valid location are kept in [`PointIndex::points`] but never
/// indexed, so they can never be returned as visible.
pub struct PointIndex {
    points: Vec<MapPoint>,
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Bulk-load an index from a point set.
    pub fn new(points: Vec<MapPoint>) -> Self {
        let indexed: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| {
                let location = p.location()?;
                Some(IndexedPoint { idx, lat: location.latitude, lng: location.longitude })
            })
            .collect();

        log::debug!(
            "[PointIndex] Indexed {} of {} points",
            indexed.len(),
            points.len()
        );

        Self {
            points,
            tree: RTree::bulk_load(indexed),
        }
    }

    /// All points, in their original order.
    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    /// Number of points with a valid location.
    pub fn located_len(&self) -> usize {
        self.tree.size()
    }

    /// Same result as [`filter_visible`] over [`PointIndex::points`].
    pub fn visible(&self, viewport: &Viewport, buffer: f64) -> Vec<&MapPoint> {
        let bounds = viewport.bounds(buffer);
        let envelope = AABB::from_corners(
            [bounds.min_lat, bounds.min_lng],
            [bounds.max_lat, bounds.max_lng],
        );

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|p| p.idx)
            .collect();
        hits.sort_unstable();

        hits.into_iter().map(|idx| &self.points[idx]).collect()
    }
}
