//! Caller-side memo for recomputes.
//!
//! Map widgets fire region-change events far more often than the visible markers change.
//! [`ClusterCache`] remembers the last inputs and returns the previous markers when
//! nothing changed. It never changes the result: a hit requires the same points (compared
//! in full, not just by fingerprint), viewport and pinned id, so it returns exactly what a
//! fresh [`recompute`](crate::recompute) would.

use std::hash::{Hash, Hasher};
use log::debug;
use rustc_hash::FxHasher;
use crate::clustering::{recompute, ClusterConfig};
use crate::projection::Projection;
use crate::{ClusterDescriptor, MapPoint, Viewport};

/// Order-sensitive fingerprint of a point set.
///
/// Covers ids, coordinates and display attributes, so any change that could alter a
/// marker changes the fingerprint. Reordering the points also changes it, because the
/// clustering itself is order dependent.
pub fn point_set_fingerprint(points: &[MapPoint]) -> u64 {
    let mut hasher = FxHasher::default();
    points.len().hash(&mut hasher);

    for point in points {
        point.id.hash(&mut hasher);
        point.latitude.map(f64::to_bits).hash(&mut hasher);
        point.longitude.map(f64::to_bits).hash(&mut hasher);

        let mut attributes: Vec<(&String, &String)> = point.attributes.iter().collect();
        attributes.sort_unstable();
        attributes.hash(&mut hasher);
    }

    hasher.finish()
}

/// Hit/miss counters for a [`ClusterCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone)]
struct CachedRecompute {
    fingerprint: u64,
    points: Vec<MapPoint>,
    viewport: Viewport,
    pinned_id: Option<String>,
    descriptors: Vec<ClusterDescriptor>,
}

impl CachedRecompute {
    /// The fingerprint only rejects quickly; a hit also compares the stored points.
    fn matches(
        &self,
        fingerprint: u64,
        points: &[MapPoint],
        viewport: &Viewport,
        pinned_id: Option<&str>,
    ) -> bool {
        self.fingerprint == fingerprint
            && self.viewport == *viewport
            && self.pinned_id.as_deref() == pinned_id
            && self.points == points
    }
}

/// Remembers the most recent recompute.
///
/// The projection is not part of the key. Hosts whose projection can change while the
/// viewport stays put (e.g. rotating in place) must call [`ClusterCache::invalidate`].
#[derive(Debug, Clone, Default)]
pub struct ClusterCache {
    config: ClusterConfig,
    last: Option<CachedRecompute>,
    stats: CacheStats,
}

impl ClusterCache {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config, last: None, stats: CacheStats::default() }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop the remembered result so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Markers for the inputs, reusing the previous result when they are unchanged.
    pub fn recompute<P: Projection + ?Sized>(
        &mut self,
        points: &[MapPoint],
        viewport: &Viewport,
        pinned_id: Option<&str>,
        projection: &P,
    ) -> &[ClusterDescriptor] {
        if self.lookup(points, viewport, pinned_id).is_none() {
            let descriptors = recompute(points, viewport, pinned_id, projection, &self.config);
            self.store(points.to_vec(), viewport, pinned_id, descriptors);
        }

        self.last
            .as_ref()
            .map(|last| last.descriptors.as_slice())
            .unwrap_or_default()
    }

    /// The remembered markers if the inputs match the last recompute. Counts a hit or a
    /// miss.
    ///
    /// With [`ClusterCache::store`] this lets a caller run the recompute itself, e.g.
    /// without holding a lock on the cache while a host projection is called.
    pub fn lookup(
        &mut self,
        points: &[MapPoint],
        viewport: &Viewport,
        pinned_id: Option<&str>,
    ) -> Option<&[ClusterDescriptor]> {
        let fingerprint = point_set_fingerprint(points);
        let hit = self
            .last
            .as_ref()
            .is_some_and(|last| last.matches(fingerprint, points, viewport, pinned_id));

        if !hit {
            self.stats.misses += 1;
            return None;
        }

        self.stats.hits += 1;
        debug!("[ClusterCache] Reusing markers (hits: {})", self.stats.hits);
        self.last.as_ref().map(|last| last.descriptors.as_slice())
    }

    /// Remember `descriptors` as the result for these inputs.
    pub fn store(
        &mut self,
        points: Vec<MapPoint>,
        viewport: &Viewport,
        pinned_id: Option<&str>,
        descriptors: Vec<ClusterDescriptor>,
    ) {
        self.last = Some(CachedRecompute {
            fingerprint: point_set_fingerprint(&points),
            points,
            viewport: *viewport,
            pinned_id: pinned_id.map(str::to_string),
            descriptors,
        });
    }
}
