//! Coordinate and world-space types.
//!
//! Geographic positions are `LatLng` in degrees. The host renders in a
//! metric world space whose origin (the *floating origin*) is a chosen
//! `LatLng`; `FloatingOrigin` converts between the two.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_M;

/// 3D Vector - world-space position in metres (x east, y up, z north)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl LatLng {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if both components are finite and inside the valid range.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in metres (haversine).
    #[must_use]
    pub fn haversine_distance(self, other: Self) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let d_phi = (other.latitude - self.latitude).to_radians();
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Euclidean distance treating degrees as plane coordinates.
    #[must_use]
    pub fn planar_distance(self, other: Self) -> f64 {
        let d_lat = other.latitude - self.latitude;
        let d_lng = other.longitude - self.longitude;
        d_lat.hypot(d_lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Equirectangular projection around a floating origin.
///
/// Accurate to well under a metre across the few kilometres the client ever
/// streams, which is what the host's world space assumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingOrigin {
    origin: LatLng,
    /// Metres per degree of longitude at the origin latitude.
    metres_per_deg_lng: f64,
}

/// Metres per degree of latitude.
const METRES_PER_DEG_LAT: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

impl FloatingOrigin {
    /// Creates a projection centred on `origin`.
    #[must_use]
    pub fn new(origin: LatLng) -> Self {
        Self {
            origin,
            metres_per_deg_lng: METRES_PER_DEG_LAT * origin.latitude.to_radians().cos(),
        }
    }

    /// Returns the origin coordinate.
    #[must_use]
    pub const fn origin(&self) -> LatLng {
        self.origin
    }

    /// Projects a coordinate into world space.
    #[must_use]
    pub fn to_world(&self, point: LatLng) -> Vec3 {
        Vec3::new(
            (point.longitude - self.origin.longitude) * self.metres_per_deg_lng,
            0.0,
            (point.latitude - self.origin.latitude) * METRES_PER_DEG_LAT,
        )
    }

    /// Converts a world-space position back to a coordinate.
    ///
    /// The y component is ignored.
    #[must_use]
    pub fn to_lat_lng(&self, position: Vec3) -> LatLng {
        let longitude = if self.metres_per_deg_lng.abs() < f64::EPSILON {
            self.origin.longitude
        } else {
            self.origin.longitude + position.x / self.metres_per_deg_lng
        };
        LatLng::new(
            self.origin.latitude + position.z / METRES_PER_DEG_LAT,
            longitude,
        )
    }

    /// World-space distance in metres between two coordinates.
    #[must_use]
    pub fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        self.to_world(a).distance(self.to_world(b))
    }
}

/// Axis-aligned geographic box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl Bounds {
    /// Square box extending `distance` metres from `center` along both axes.
    #[must_use]
    pub fn around(projection: &FloatingOrigin, center: LatLng, distance: f64) -> Self {
        let c = projection.to_world(center);
        let north_east = projection.to_lat_lng(c + Vec3::new(distance, 0.0, distance));
        let south_west = projection.to_lat_lng(c - Vec3::new(distance, 0.0, distance));
        Self {
            south_west,
            north_east,
        }
    }

    /// Returns true if `point` lies inside the box (edges included).
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }
}
