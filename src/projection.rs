//! Screen projection used to measure marker separation.
//!
//! Clustering distances are measured in screen pixels, not metres: two gyms merge when
//! their markers would overlap on the map as it is currently drawn. The host map widget
//! owns the real projection (zoom, rotation, tilt), so the engine only depends on the
//! [`Projection`] capability and never implements Mercator itself.
//!
//! [`LinearProjection`] is a synthetic stand-in that maps the viewport span linearly onto
//! a screen of known size. It is what the unit tests use and what hosts without a
//! projection of their own can fall back to.

use geo::{Distance, Euclidean, Point};
use serde::{Deserialize, Serialize};
use crate::{GpsPoint, Viewport};

/// A position on screen, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Converts geographic coordinates to screen pixels for a viewport.
///
/// Implementations must reflect the live geometry of whatever is rendering the map,
/// including the current zoom and rotation.
pub trait Projection {
    fn project(&self, coordinate: GpsPoint, viewport: &Viewport) -> PixelPoint;
}

impl<P: Projection + ?Sized> Projection for &P {
    fn project(&self, coordinate: GpsPoint, viewport: &Viewport) -> PixelPoint {
        (**self).project(coordinate, viewport)
    }
}

impl<P: Projection + ?Sized> Projection for Box<P> {
    fn project(&self, coordinate: GpsPoint, viewport: &Viewport) -> PixelPoint {
        (**self).project(coordinate, viewport)
    }
}

/// Euclidean distance between two screen positions.
#[inline]
pub fn pixel_distance(a: PixelPoint, b: PixelPoint) -> f64 {
    Euclidean::distance(Point::new(a.x, a.y), Point::new(b.x, b.y))
}

/// Equirectangular screen projection over a fixed-size screen.
///
/// The viewport span fills the screen exactly: `longitude_delta` maps to `width_px` and
/// `latitude_delta` to `height_px`, with the viewport center at the middle of the
/// screen. `bearing_degrees` rotates the map clockwise around that center.
///
/// # Example
///
/// ```rust
/// use marker_cluster::{GpsPoint, LinearProjection, Projection, Span, Viewport};
///
/// let viewport = Viewport::new(GpsPoint::new(51.5, -0.1), Span::new(0.1, 0.1));
/// let projection = LinearProjection::new(1000.0, 1000.0);
///
/// let px = projection.project(GpsPoint::new(51.5, -0.1), &viewport);
/// assert_eq!((px.x, px.y), (500.0, 500.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct LinearProjection {
    pub width_px: f64,
    pub height_px: f64,
    pub bearing_degrees: f64,
}

impl LinearProjection {
    /// North-up projection onto a `width_px` x `height_px` screen.
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self { width_px, height_px, bearing_degrees: 0.0 }
    }

    pub fn with_bearing(mut self, bearing_degrees: f64) -> Self {
        self.bearing_degrees = bearing_degrees;
        self
    }
}

impl Projection for LinearProjection {
    fn project(&self, coordinate: GpsPoint, viewport: &Viewport) -> PixelPoint {
        // A zero span would put every point at infinity
        let lng_delta = viewport.span.longitude_delta.max(f64::EPSILON);
        let lat_delta = viewport.span.latitude_delta.max(f64::EPSILON);

        let dx = (coordinate.longitude - viewport.center.longitude) * self.width_px / lng_delta;
        // Screen y grows downwards
        let dy = (viewport.center.latitude - coordinate.latitude) * self.height_px / lat_delta;

        let (sin, cos) = (-self.bearing_degrees).to_radians().sin_cos();
        let x = dx * cos - dy * sin;
        let y = dx * sin + dy * cos;

        PixelPoint::new(x + self.width_px / 2.0, y + self.height_px / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    fn london_viewport() -> Viewport {
        Viewport::new(GpsPoint::new(51.5, -0.1), Span::new(0.1, 0.2))
    }

    #[test]
    fn test_center_projects_to_screen_middle() {
        let projection = LinearProjection::new(800.0, 600.0);
        let px = projection.project(GpsPoint::new(51.5, -0.1), &london_viewport());
        assert!((px.x - 400.0).abs() < 1e-9);
        assert!((px.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_span_edges_map_to_screen_edges() {
        let projection = LinearProjection::new(800.0, 600.0);
        let viewport = london_viewport();

        // North-east corner of the viewport
        let ne = projection.project(GpsPoint::new(51.55, 0.0), &viewport);
        assert!((ne.x - 800.0).abs() < 1e-6);
        assert!(ne.y.abs() < 1e-6);

        // South-west corner
        let sw = projection.project(GpsPoint::new(51.45, -0.2), &viewport);
        assert!(sw.x.abs() < 1e-6);
        assert!((sw.y - 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_preserves_distances() {
        let viewport = london_viewport();
        let a = GpsPoint::new(51.51, -0.11);
        let b = GpsPoint::new(51.49, -0.07);

        let north_up = LinearProjection::new(1000.0, 1000.0);
        let rotated = north_up.with_bearing(37.0);

        let d1 = pixel_distance(north_up.project(a, &viewport), north_up.project(b, &viewport));
        let d2 = pixel_distance(rotated.project(a, &viewport), rotated.project(b, &viewport));
        assert!((d1 - d2).abs() < 1e-6);
    }

    #[test]
    fn test_zero_span_stays_finite() {
        let projection = LinearProjection::new(100.0, 100.0);
        let viewport = Viewport::new(GpsPoint::new(0.0, 0.0), Span::new(0.0, 0.0));
        let px = projection.project(GpsPoint::new(0.0, 0.0), &viewport);
        assert!(px.x.is_finite() && px.y.is_finite());
    }

    #[test]
    fn test_pixel_distance() {
        assert_eq!(pixel_distance(PixelPoint::new(0.0, 0.0), PixelPoint::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_boxed_projection_delegates() {
        let boxed: Box<dyn Projection> = Box::new(LinearProjection::new(200.0, 200.0));
        let px = boxed.project(GpsPoint::new(51.5, -0.1), &london_viewport());
        assert!((px.x - 100.0).abs() < 1e-9);
    }
}
