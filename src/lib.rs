//! # Marker Cluster
//!
//! Viewport-aware map marker clustering for gym discovery maps.
//!
//! This library provides:
//! - Viewport filtering of point sets, linear or R-tree backed
//! - Greedy pixel-distance clustering with zoom-dependent thresholds
//! - A pinned point that is always drawn as its own marker
//! - Zoom-to-fit regions for tapped clusters
//! - Marker batching and diffing helpers for the host's render layer
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel viewport filtering with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use marker_cluster::{
//!     ClusterConfig, GpsPoint, LinearProjection, MapPoint, Span, Viewport,
//!     recompute, region_for_cluster,
//! };
//!
//! let gyms = vec![
//!     MapPoint::new("1", 51.5074, -0.1278).with_attribute("name", "Iron Works"),
//!     MapPoint::new("2", 51.5076, -0.1280),
//!     MapPoint::new("3", 51.5310, -0.1000),
//! ];
//!
//! let viewport = Viewport::new(GpsPoint::new(51.51, -0.12), Span::new(0.1, 0.1));
//! let screen = LinearProjection::new(390.0, 844.0);
//! let config = ClusterConfig::default();
//!
//! let markers = recompute(&gyms, &viewport, Some("3"), &screen, &config);
//! for marker in &markers {
//!     println!("{} gym(s) at {:?} (pinned: {})", marker.count, marker.coordinate, marker.is_pinned);
//! }
//!
//! // Tapping the two-gym cluster zooms to fit it
//! let cluster = markers.iter().find(|m| m.count > 1).unwrap();
//! let region = region_for_cluster(cluster, &gyms, &config).unwrap();
//! assert!(region.span.latitude_delta >= config.min_region_span);
//! ```

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{ClusterError, Result};

// Geographic utilities (bounds, center calculations)
pub mod geo_utils;

// Screen projection capability
pub mod projection;
pub use projection::{LinearProjection, PixelPoint, Projection, pixel_distance};

// Viewport filtering
pub mod viewport;
pub use viewport::{PointIndex, filter_visible};

// Greedy clustering
pub mod clustering;
pub use clustering::{
    ClusterConfig, PinnedSplit, ThresholdBand,
    cluster_points, pinned_descriptor, pixel_threshold, recompute, recompute_indexed, split_pinned,
};

// Zoom-to-fit for tapped clusters
pub mod region;
pub use region::{bounding_region, region_for_cluster, zoom_in_region};

// Render layer helpers
pub mod markers;
pub use markers::{MarkerDiff, diff_markers, marker_batches};

// Recompute memo
pub mod cache;
pub use cache::{CacheStats, ClusterCache, point_set_fingerprint};

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("MarkerClusterRust")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use marker_cluster::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        geo_utils::compute_bounds(points)
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: &GpsPoint) -> bool {
        geo_utils::bounds_contains(self, point)
    }
}

/// A gym (or any point of interest) to place on the map.
///
/// Either coordinate may be missing. Points without a valid location are never shown
/// and never counted in a cluster. `attributes` carries display data (name, address,
/// ...) through to single-gym markers untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MapPoint {
    /// Stable identifier, unique within a point set
    pub id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl MapPoint {
    /// Create a located point with no attributes.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            attributes: HashMap::new(),
        }
    }

    /// Add a display attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The point's location, if both coordinates are present and in range.
    ///
    /// # Example
    /// ```
    /// use marker_cluster::MapPoint;
    ///
    /// assert!(MapPoint::new("ok", 51.5, -0.1).location().is_some());
    /// assert!(MapPoint::new("too-far-north", 91.0, -0.1).location().is_none());
    ///
    /// let mut missing = MapPoint::new("missing", 51.5, -0.1);
    /// missing.longitude = None;
    /// assert!(missing.location().is_none());
    /// ```
    pub fn location(&self) -> Option<GpsPoint> {
        let point = GpsPoint::new(self.latitude?, self.longitude?);
        point.is_valid().then_some(point)
    }
}

/// Visible extent of the map in degrees. Larger deltas mean more zoomed out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Span {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Span {
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self { latitude_delta, longitude_delta }
    }

    /// The larger of the two deltas, which drives the clustering threshold.
    pub fn max_delta(&self) -> f64 {
        self.latitude_delta.max(self.longitude_delta)
    }
}

/// What the map is showing: a center and a span.
///
/// Zoom-to-fit results use the same type, ready to hand back to the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Viewport {
    pub center: GpsPoint,
    pub span: Span,
}

impl Viewport {
    pub fn new(center: GpsPoint, span: Span) -> Self {
        Self { center, span }
    }

    /// Visible bounds expanded by `buffer` degrees on every side.
    pub fn bounds(&self, buffer: f64) -> Bounds {
        let half_lat = self.span.latitude_delta / 2.0 + buffer;
        let half_lng = self.span.longitude_delta / 2.0 + buffer;
        Bounds {
            min_lat: self.center.latitude - half_lat,
            max_lat: self.center.latitude + half_lat,
            min_lng: self.center.longitude - half_lng,
            max_lng: self.center.longitude + half_lng,
        }
    }
}

/// One marker to render: a single gym, a cluster of gyms, or the pinned gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ClusterDescriptor {
    /// Marker position. The seed's location for a single gym, the mean of the
    /// members' coordinates for a cluster.
    pub coordinate: GpsPoint,
    /// Number of gyms represented (`member_ids.len()`, saturating at `u32::MAX`)
    pub count: u32,
    /// Ids of every gym in the marker
    pub member_ids: Vec<String>,
    /// True only for the pinned gym, which is never clustered
    pub is_pinned: bool,
    /// The gym itself when `count == 1`, for name/address callouts
    pub representative_point: Option<MapPoint>,
}

impl ClusterDescriptor {
    /// Marker for one unpinned gym.
    pub fn single(point: &MapPoint, location: GpsPoint) -> Self {
        Self {
            coordinate: location,
            count: 1,
            member_ids: vec![point.id.clone()],
            is_pinned: false,
            representative_point: Some(point.clone()),
        }
    }

    /// Marker for the pinned gym.
    pub fn pinned(point: &MapPoint, location: GpsPoint) -> Self {
        Self { is_pinned: true, ..Self::single(point, location) }
    }

    /// Marker for several gyms, drawn as a count badge.
    pub fn group(coordinate: GpsPoint, member_ids: Vec<String>) -> Self {
        Self {
            coordinate,
            count: saturating_count(member_ids.len()),
            member_ids,
            is_pinned: false,
            representative_point: None,
        }
    }

    /// True when the marker stands for more than one gym.
    pub fn is_cluster(&self) -> bool {
        self.count > 1
    }

    /// Identity of the marker across recomputes: pinned state and members.
    ///
    /// Ids are length-prefixed so ids containing the separator can't collide. The key
    /// says nothing about position or attributes, so a marker with the same key may
    /// still need redrawing (see [`diff_markers`]).
    pub fn marker_key(&self) -> String {
        let kind = if self.is_pinned { "pinned" } else { "cluster" };
        let members: Vec<String> = self
            .member_ids
            .iter()
            .map(|id| format!("{}:{}", id.len(), id))
            .collect();
        format!("{}:{}:{}", kind, self.count, members.join(","))
    }
}

/// Member count for a descriptor, saturating at `u32::MAX`.
fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::{debug, info, warn};
    use std::sync::{Arc, Mutex};

    /// Projection of the host's live map widget.
    /// Implement this in Kotlin/Swift on top of the platform map's point conversion.
    #[uniffi::export(callback_interface)]
    pub trait MapProjection: Send + Sync {
        /// Screen position of `coordinate` as currently drawn, in pixels.
        fn project(&self, coordinate: GpsPoint, viewport: Viewport) -> PixelPoint;
    }

    struct HostProjection(Box<dyn MapProjection>);

    /// Reject a host-supplied config before clustering with it.
    fn checked_config(config: &ClusterConfig) -> std::result::Result<(), ClusterError> {
        config.validate().inspect_err(|e| {
            warn!("[MarkerClusterRust] Rejecting cluster config: {}", e);
        })
    }

    impl Projection for HostProjection {
        fn project(&self, coordinate: GpsPoint, viewport: &Viewport) -> PixelPoint {
            self.0.project(coordinate, *viewport)
        }
    }

    /// Cluster the visible gyms using the host's projection.
    #[uniffi::export]
    pub fn ffi_recompute_clusters(
        points: Vec<MapPoint>,
        viewport: Viewport,
        pinned_id: Option<String>,
        projection: Box<dyn MapProjection>,
        config: ClusterConfig,
    ) -> std::result::Result<Vec<ClusterDescriptor>, ClusterError> {
        init_logging();
        info!("[MarkerClusterRust] 🦀 recompute_clusters called with {} points", points.len());
        checked_config(&config)?;

        let start = std::time::Instant::now();
        let projection = HostProjection(projection);
        let markers = recompute(&points, &viewport, pinned_id.as_deref(), &projection, &config);

        info!("[MarkerClusterRust] 🦀 {} markers in {:?}", markers.len(), start.elapsed());
        Ok(markers)
    }

    /// Cluster the visible gyms using a linear projection over the given screen.
    /// Avoids one callback per point when the host map is north-up and unpitched.
    #[uniffi::export]
    pub fn ffi_recompute_clusters_linear(
        points: Vec<MapPoint>,
        viewport: Viewport,
        pinned_id: Option<String>,
        screen: LinearProjection,
        config: ClusterConfig,
    ) -> std::result::Result<Vec<ClusterDescriptor>, ClusterError> {
        init_logging();
        info!(
            "[MarkerClusterRust] 🦀 recompute_clusters_linear called with {} points ({}x{}px)",
            points.len(),
            screen.width_px,
            screen.height_px
        );
        checked_config(&config)?;

        let start = std::time::Instant::now();
        let markers = recompute(&points, &viewport, pinned_id.as_deref(), &screen, &config);

        info!("[MarkerClusterRust] 🦀 {} markers in {:?}", markers.len(), start.elapsed());
        Ok(markers)
    }

    /// Zoom-to-fit region for a set of member locations.
    #[uniffi::export]
    pub fn ffi_bounding_region(points: Vec<GpsPoint>, config: ClusterConfig) -> std::result::Result<Viewport, ClusterError> {
        init_logging();
        let result = bounding_region(&points, &config);
        if result.is_err() {
            info!("[MarkerClusterRust] No located members, leaving viewport unchanged");
        }
        result
    }

    /// Zoom-to-fit region for a tapped marker.
    #[uniffi::export]
    pub fn ffi_region_for_cluster(
        descriptor: ClusterDescriptor,
        points: Vec<MapPoint>,
        config: ClusterConfig,
    ) -> std::result::Result<Viewport, ClusterError> {
        init_logging();
        debug!("[MarkerClusterRust] Region for cluster of {}", descriptor.count);
        region_for_cluster(&descriptor, &points, &config)
    }

    /// Halve the span around a marker. Fallback when zoom-to-fit reports `EmptyRegion`.
    #[uniffi::export]
    pub fn ffi_zoom_in_region(center: GpsPoint, viewport: Viewport, config: ClusterConfig) -> Viewport {
        zoom_in_region(center, &viewport, &config)
    }

    /// Split markers into insertion batches.
    #[uniffi::export]
    pub fn ffi_marker_batches(descriptors: Vec<ClusterDescriptor>, batch_size: u32) -> Vec<Vec<ClusterDescriptor>> {
        marker_batches(&descriptors, batch_size as usize)
            .map(|batch| batch.to_vec())
            .collect()
    }

    /// Markers to add and remove between two recomputes.
    #[uniffi::export]
    pub fn ffi_diff_markers(previous: Vec<ClusterDescriptor>, next: Vec<ClusterDescriptor>) -> MarkerDiff {
        init_logging();
        let diff = diff_markers(&previous, &next);
        debug!(
            "[MarkerClusterRust] Marker diff: +{} -{} ={}",
            diff.added.len(),
            diff.removed.len(),
            diff.retained
        );
        diff
    }

    /// Check a configuration before handing it to a session.
    #[uniffi::export]
    pub fn ffi_validate_config(config: ClusterConfig) -> std::result::Result<(), ClusterError> {
        config.validate()
    }

    /// Get default configuration.
    #[uniffi::export]
    pub fn default_cluster_config() -> ClusterConfig {
        init_logging();
        info!("[MarkerClusterRust] 🦀 default_cluster_config called - Rust is active!");
        ClusterConfig::default()
    }

    /// Long-lived clustering state for one map screen.
    /// Skips recomputes when the points, viewport and pinned gym are unchanged.
    #[derive(uniffi::Object)]
    pub struct ClusterSession {
        cache: Mutex<ClusterCache>,
    }

    impl ClusterSession {
        fn cache(&self) -> std::sync::MutexGuard<'_, ClusterCache> {
            self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        /// The lock is only held to look up and store, never while projecting, so a host
        /// projection may call back into the session.
        fn recompute_with<P: Projection + ?Sized>(
            &self,
            points: Vec<MapPoint>,
            viewport: Viewport,
            pinned_id: Option<String>,
            projection: &P,
        ) -> Vec<ClusterDescriptor> {
            let pinned_id = pinned_id.as_deref();
            let config = {
                let mut cache = self.cache();
                if let Some(markers) = cache.lookup(&points, &viewport, pinned_id) {
                    return markers.to_vec();
                }
                cache.config().clone()
            };

            let markers = recompute(&points, &viewport, pinned_id, projection, &config);
            self.cache().store(points, &viewport, pinned_id, markers.clone());
            markers
        }
    }

    #[uniffi::export]
    impl ClusterSession {
        #[uniffi::constructor]
        pub fn new(config: ClusterConfig) -> std::result::Result<Arc<Self>, ClusterError> {
            init_logging();
            config.validate()?;
            info!("[MarkerClusterRust] 🦀 ClusterSession created");
            Ok(Arc::new(Self {
                cache: Mutex::new(ClusterCache::new(config)),
            }))
        }

        pub fn recompute(
            &self,
            points: Vec<MapPoint>,
            viewport: Viewport,
            pinned_id: Option<String>,
            projection: Box<dyn MapProjection>,
        ) -> Vec<ClusterDescriptor> {
            self.recompute_with(points, viewport, pinned_id, &HostProjection(projection))
        }

        pub fn recompute_linear(
            &self,
            points: Vec<MapPoint>,
            viewport: Viewport,
            pinned_id: Option<String>,
            screen: LinearProjection,
        ) -> Vec<ClusterDescriptor> {
            self.recompute_with(points, viewport, pinned_id, &screen)
        }

        pub fn invalidate(&self) {
            self.cache().invalidate();
        }

        pub fn stats(&self) -> CacheStats {
            self.cache().stats()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        /// Host projection that reads the session's stats on every call.
        struct StatsReadingProjection {
            session: Arc<ClusterSession>,
            calls: Arc<AtomicUsize>,
        }

        impl MapProjection for StatsReadingProjection {
            fn project(&self, coordinate: GpsPoint, viewport: Viewport) -> PixelPoint {
                let _ = self.session.stats();
                self.calls.fetch_add(1, Ordering::SeqCst);
                LinearProjection::new(1000.0, 1000.0).project(coordinate, &viewport)
            }
        }

        fn gyms() -> Vec<MapPoint> {
            vec![
                MapPoint::new("a", 51.500, -0.100),
                MapPoint::new("b", 51.501, -0.100),
                MapPoint::new("c", 51.530, -0.100),
            ]
        }

        fn viewport() -> Viewport {
            Viewport::new(GpsPoint::new(51.5, -0.1), Span::new(0.1, 0.1))
        }

        #[test]
        fn test_session_projection_can_reenter_session() {
            let session = ClusterSession::new(ClusterConfig::default()).unwrap();
            let calls = Arc::new(AtomicUsize::new(0));
            let projection = StatsReadingProjection { session: session.clone(), calls: calls.clone() };

            let markers = session.recompute(gyms(), viewport(), None, Box::new(projection));
            assert_eq!(markers.len(), 2);
            assert_eq!(calls.load(Ordering::SeqCst), 3);

            // Second call is served from the cache without projecting
            let projection = StatsReadingProjection { session: session.clone(), calls: calls.clone() };
            let again = session.recompute(gyms(), viewport(), None, Box::new(projection));
            assert_eq!(again, markers);
            assert_eq!(calls.load(Ordering::SeqCst), 3);
            assert_eq!(session.stats(), CacheStats { hits: 1, misses: 1 });
        }

        #[test]
        fn test_recompute_rejects_invalid_config() {
            let mut config = ClusterConfig::default();
            config.threshold_bands[0].pixels = f64::NAN;

            let result = ffi_recompute_clusters_linear(
                gyms(),
                viewport(),
                None,
                LinearProjection::new(1000.0, 1000.0),
                config,
            );
            assert!(matches!(result, Err(ClusterError::InvalidConfig(_))));
        }

        #[test]
        fn test_recompute_accepts_default_config() {
            let markers = ffi_recompute_clusters_linear(
                gyms(),
                viewport(),
                Some("c".into()),
                LinearProjection::new(1000.0, 1000.0),
                default_cluster_config(),
            )
            .unwrap();
            assert_eq!(markers.len(), 2);
            assert!(markers[1].is_pinned);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(51.5074, -0.1278).is_valid());
        assert!(GpsPoint::new(-90.0, 180.0).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(0.0, -180.5).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_map_point_location() {
        assert_eq!(MapPoint::new("a", 1.0, 2.0).location(), Some(GpsPoint::new(1.0, 2.0)));

        let unlocated = MapPoint { id: "b".into(), ..Default::default() };
        assert!(unlocated.location().is_none());

        let mut half = MapPoint::new("c", 1.0, 2.0);
        half.latitude = None;
        assert!(half.location().is_none());
    }

    #[test]
    fn test_viewport_bounds() {
        let viewport = Viewport::new(GpsPoint::new(10.0, 20.0), Span::new(2.0, 4.0));
        let bounds = viewport.bounds(0.5);
        assert_eq!(bounds, Bounds { min_lat: 8.5, max_lat: 11.5, min_lng: 17.5, max_lng: 22.5 });
        assert_eq!(viewport.span.max_delta(), 4.0);
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = Bounds::from_points(&[GpsPoint::new(1.0, 5.0), GpsPoint::new(3.0, 2.0)]).unwrap();
        assert_eq!(bounds.center(), GpsPoint::new(2.0, 3.5));
        assert!(bounds.contains(&GpsPoint::new(3.0, 5.0)));
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_descriptor_constructors() {
        let point = MapPoint::new("gym", 1.0, 2.0).with_attribute("name", "Iron Works");

        let single = ClusterDescriptor::single(&point, GpsPoint::new(1.0, 2.0));
        assert_eq!(single.count, 1);
        assert!(!single.is_pinned);
        assert!(!single.is_cluster());
        assert_eq!(
            single.representative_point.as_ref().and_then(|p| p.attributes.get("name")),
            Some(&"Iron Works".to_string())
        );

        let pinned = ClusterDescriptor::pinned(&point, GpsPoint::new(1.0, 2.0));
        assert!(pinned.is_pinned);
        assert_ne!(single.marker_key(), pinned.marker_key());

        let group = ClusterDescriptor::group(GpsPoint::new(1.0, 2.0), vec!["a".into(), "b".into()]);
        assert_eq!(group.count, 2);
        assert!(group.is_cluster());
        assert!(group.representative_point.is_none());
        assert_eq!(group.marker_key(), "cluster:2:1:a,1:b");
    }

    #[test]
    fn test_marker_key_ids_with_separator() {
        let left = ClusterDescriptor::group(GpsPoint::new(0.0, 0.0), vec!["a,b".into(), "c".into()]);
        let right = ClusterDescriptor::group(GpsPoint::new(0.0, 0.0), vec!["a".into(), "b,c".into()]);
        assert_ne!(left.marker_key(), right.marker_key());
    }

    #[test]
    fn test_count_saturates() {
        assert_eq!(saturating_count(3), 3);
        assert_eq!(saturating_count(u32::MAX as usize), u32::MAX);
        assert_eq!(saturating_count(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_descriptor_json_shape() {
        let point = MapPoint::new("gym-1", 51.5, -0.1).with_attribute("name", "Iron Works");
        let marker = ClusterDescriptor::pinned(&point, GpsPoint::new(51.5, -0.1));

        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["is_pinned"], true);
        assert_eq!(json["member_ids"][0], "gym-1");
        assert_eq!(json["representative_point"]["attributes"]["name"], "Iron Works");

        let back: ClusterDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, marker);
    }

    #[test]
    fn test_map_point_attributes_default_when_absent() {
        let point: MapPoint =
            serde_json::from_str(r#"{"id":"g","latitude":1.0,"longitude":null}"#).unwrap();
        assert!(point.attributes.is_empty());
        assert!(point.location().is_none());
    }
}
