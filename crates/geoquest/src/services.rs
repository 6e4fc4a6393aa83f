//! Session state services.
//!
//! Each service owns one piece of server data for the lifetime of a
//! session. The controller owns the services; nothing here is global.

use geoquest_core::SpawnEntity;
use geoquest_economy::{PlayerData, ReferenceData};
use geoquest_shared::{SpawnKind, SpawnLocation, WorldData};

/// Holds the reference data once loaded.
#[derive(Debug, Default)]
pub struct ReferenceService {
    data: Option<ReferenceData>,
}

impl ReferenceService {
    /// Installs freshly loaded data.
    pub fn init(&mut self, data: ReferenceData) {
        tracing::debug!("Reference data installed: {} item(s)", data.len());
        self.data = Some(data);
    }

    /// The data, if loaded.
    #[must_use]
    pub fn data(&self) -> Option<&ReferenceData> {
        self.data.as_ref()
    }

    /// Returns true once loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }
}

/// Holds the player data once loaded and tracks local edits.
#[derive(Debug, Default)]
pub struct PlayerService {
    data: Option<PlayerData>,
    changed: bool,
}

impl PlayerService {
    /// Installs freshly loaded data. Clears the changed flag.
    pub fn init(&mut self, data: PlayerData) {
        self.data = Some(data);
        self.changed = false;
    }

    /// The data, if loaded.
    #[must_use]
    pub fn data(&self) -> Option<&PlayerData> {
        self.data.as_ref()
    }

    /// The data for local edits. Marks it changed.
    pub fn data_mut(&mut self) -> Option<&mut PlayerData> {
        let data = self.data.as_mut()?;
        self.changed = true;
        Some(data)
    }

    /// Returns true if edited since the last `init`.
    #[must_use]
    pub const fn has_changed(&self) -> bool {
        self.changed
    }

    /// Returns true once loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }

    /// Forgets the player.
    pub fn reset(&mut self) {
        self.data = None;
        self.changed = false;
    }
}

/// Holds the latest world data.
#[derive(Debug, Default)]
pub struct WorldService {
    data: WorldData,
}

impl WorldService {
    /// Replaces the world data with a fresh batch.
    pub fn init(&mut self, data: WorldData) {
        self.data = data;
    }

    /// The current world data.
    #[must_use]
    pub const fn data(&self) -> &WorldData {
        &self.data
    }

    /// Looks up a location.
    #[must_use]
    pub fn spawn_location(&self, id: &str) -> Option<&SpawnLocation> {
        self.data.get(id)
    }

    /// Looks up a location for mutation.
    pub fn spawn_location_mut(&mut self, id: &str) -> Option<&mut SpawnLocation> {
        self.data.get_mut(id)
    }

    /// Locations of one kind.
    pub fn of_kind(&self, kind: SpawnKind) -> impl Iterator<Item = &SpawnLocation> {
        self.data.of_kind(kind)
    }

    /// Every location as a reconciler entity, in id order.
    #[must_use]
    pub fn entities(&self) -> Vec<SpawnEntity> {
        self.data.locations.values().map(SpawnEntity::from).collect()
    }

    /// Drops all locations.
    pub fn clear(&mut self) {
        self.data = WorldData::default();
    }
}
