//! Game world models exchanged with the game server.
//!
//! The host fetches these over its own transport and hands them to the core
//! already decoded; field names match the server's JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CHEST, ENERGY_STATION, MINION, TOWER};
use crate::math::{Bounds, LatLng};

/// Category of a spawned world object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    /// Tower guarded by a general.
    Tower,
    /// Minion to battle.
    Minion,
    /// Treasure chest.
    Chest,
    /// Energy refill station.
    EnergyStation,
}

impl SpawnKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 4] = [Self::Tower, Self::Minion, Self::Chest, Self::EnergyStation];

    /// Reference-data identifier for this kind.
    #[must_use]
    pub const fn item_id(self) -> &'static str {
        match self {
            Self::Tower => TOWER,
            Self::Minion => MINION,
            Self::Chest => CHEST,
            Self::EnergyStation => ENERGY_STATION,
        }
    }

    /// Parses a reference-data identifier.
    #[must_use]
    pub fn from_item_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.item_id() == id)
    }
}

impl std::fmt::Display for SpawnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.item_id())
    }
}

/// A world object placed on a playable location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnLocation {
    /// Stable identifier, unique across refreshes.
    pub id: String,
    /// What stands here.
    #[serde(rename = "object_type_id")]
    pub kind: SpawnKind,
    /// Walkable point resolved by the server, absent until resolved.
    #[serde(default, rename = "snappedPoint")]
    pub snapped_point: Option<LatLng>,
    /// False while respawning.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Unix time (seconds) at which an inactive location comes back.
    #[serde(default)]
    pub respawn_time: Option<u64>,
    /// Whether the location comes back after being used.
    #[serde(default)]
    pub respawns: bool,
    /// Keys consumed to activate it.
    #[serde(default, rename = "number_of_keys_to_activate")]
    pub keys_to_activate: u32,
    /// Item id of the key type, if any.
    #[serde(default, rename = "key_type_id")]
    pub key_type: Option<String>,
}

const fn default_active() -> bool {
    true
}

impl SpawnLocation {
    /// Creates an active location with no key requirement.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: SpawnKind, snapped_point: Option<LatLng>) -> Self {
        Self {
            id: id.into(),
            kind,
            snapped_point,
            active: true,
            respawn_time: None,
            respawns: false,
            keys_to_activate: 0,
            key_type: None,
        }
    }
}

/// A raw playable location as returned by the location provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayableLocation {
    /// Resource name, e.g. `curated/ChIJ...`.
    pub name: String,
    /// Snapped walkable point.
    #[serde(default, rename = "snappedPoint")]
    pub snapped_point: Option<LatLng>,
    /// Centre of the place.
    #[serde(default, rename = "centerPoint")]
    pub center_point: Option<LatLng>,
}

/// All spawn locations known for the current player.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    /// Locations keyed by id.
    #[serde(default)]
    pub locations: BTreeMap<String, SpawnLocation>,
}

impl WorldData {
    /// Builds world data from a list of locations. Later duplicates win.
    #[must_use]
    pub fn from_locations(locations: impl IntoIterator<Item = SpawnLocation>) -> Self {
        Self {
            locations: locations.into_iter().map(|l| (l.id.clone(), l)).collect(),
        }
    }

    /// Looks up a location.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SpawnLocation> {
        self.locations.get(id)
    }

    /// Looks up a location for mutation.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SpawnLocation> {
        self.locations.get_mut(id)
    }

    /// Iterates over locations of one kind.
    pub fn of_kind(&self, kind: SpawnKind) -> impl Iterator<Item = &SpawnLocation> {
        self.locations.values().filter(move |l| l.kind == kind)
    }

    /// Number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns true if there are no locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Request for all spawn locations inside a box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldDataRequest {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl From<Bounds> for WorldDataRequest {
    fn from(bounds: Bounds) -> Self {
        Self {
            south_west: bounds.south_west,
            north_east: bounds.north_east,
        }
    }
}
