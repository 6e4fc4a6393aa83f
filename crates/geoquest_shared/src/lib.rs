//! # GEOQUEST Shared
//!
//! Common types used by the session core, the game rules and the host glue.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on the host map SDK or the renderer.
//! If you need a handle to something the host draws, it belongs behind a
//! trait in `geoquest_core` or `geoquest`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;
pub mod models;

pub use constants::{DEFAULT_LOCATION, DEFAULT_MAX_DISTANCE_M, EARTH_RADIUS_M};
pub use math::{Bounds, FloatingOrigin, LatLng, Vec3};
pub use models::{PlayableLocation, SpawnKind, SpawnLocation, WorldData, WorldDataRequest};
