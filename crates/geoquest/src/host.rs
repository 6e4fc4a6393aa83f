//! # Host Traits
//!
//! Traits the host application implements to drive a session.
//!
//! ```text
//! Controller defines:   Host implements:
//! ┌────────────────┐    ┌────────────────┐
//! │ trait Foo      │ ←─ │ impl Foo       │
//! └────────────────┘    └────────────────┘
//! ```
//!
//! Requests go out through these traits; results come back through the
//! controller's `on_*` callbacks, possibly much later and in any order.

use geoquest_core::Squasher;
use geoquest_shared::LatLng;
use thiserror::Error;

pub use geoquest_core::SpawnRenderer;

/// Failure reported by a host loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LoadError {
    /// Human-readable cause.
    pub message: String,
}

impl LoadError {
    /// Creates an error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// DATA LOADING
// ============================================================================

/// Issues the asynchronous loads a session waits on.
///
/// Each request is answered by exactly one controller callback, success or
/// failure. A failed load may be retried by calling the request again.
pub trait DataLoader {
    /// Requests the reference data. Answered by
    /// `on_reference_data_loaded`.
    fn fetch_reference_data(&mut self);

    /// Requests the player data. Answered by `on_player_data_loaded`.
    fn fetch_player_data(&mut self);

    /// Starts loading the map around `center`. Answered by `on_map_loaded`
    /// or `on_load_error`.
    fn load_map(&mut self, center: LatLng);
}

// ============================================================================
// MAP STRUCTURES
// ============================================================================

/// Kind of feature the map SDK created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// Extruded building footprint.
    Extruded,
    /// Modeled 3D building.
    Modeled,
    /// Flat region (park, water).
    Region,
    /// Road or path segment.
    Segment,
}

impl StructureKind {
    /// Returns true for buildings, which get squashed near the avatar.
    #[must_use]
    pub const fn is_building(self) -> bool {
        matches!(self, Self::Extruded | Self::Modeled)
    }
}

/// Attaches behaviour to structures the map SDK creates.
pub trait StructureDecorator {
    /// Host handle to a structure.
    type Structure;

    /// Attaches a squasher to a building.
    fn attach_squasher(&mut self, structure: &mut Self::Structure, squasher: Squasher);
}
