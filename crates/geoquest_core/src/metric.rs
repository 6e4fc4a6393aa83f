//! Distance metrics used for spawn visibility.

use geoquest_shared::{FloatingOrigin, LatLng};

/// Measures the distance between two coordinates.
///
/// The unit is whatever the visibility radius is expressed in.
pub trait DistanceMetric {
    /// Distance from `a` to `b`.
    fn distance(&self, a: LatLng, b: LatLng) -> f64;
}

/// Euclidean distance over raw degrees.
///
/// For coordinates the host already projected into a plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct Planar;

impl DistanceMetric for Planar {
    #[inline]
    fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        a.planar_distance(b)
    }
}

/// Great-circle distance in metres.
#[derive(Clone, Copy, Debug, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    #[inline]
    fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        a.haversine_distance(b)
    }
}

/// World-space distance in metres, as the host measures it.
impl DistanceMetric for FloatingOrigin {
    #[inline]
    fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        FloatingOrigin::distance(self, a, b)
    }
}
