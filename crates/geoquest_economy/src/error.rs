//! # Economy Error Types
//!
//! All errors that can occur while applying the game rules.

use thiserror::Error;

/// Errors that can occur in the economy system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconomyError {
    /// Tried to remove more of an item than the inventory holds.
    #[error("insufficient items: need {required} of {item_id}, have {available}")]
    InsufficientItems {
        /// The item that was short.
        item_id: String,
        /// The amount required.
        required: u32,
        /// The amount available.
        available: u32,
    },

    /// Not enough keys to unlock a location.
    #[error("not enough {key_type} to unlock {location_id}: need {required}, have {available}")]
    NotEnoughResources {
        /// The location being unlocked.
        location_id: String,
        /// The key item consumed.
        key_type: String,
        /// Keys required.
        required: u32,
        /// Keys held.
        available: u32,
    },

    /// Reference data has no entry for an item.
    #[error("reference item not found: {0}")]
    ReferenceItemNotFound(String),

    /// World data has no such location.
    #[error("location not found: {0}")]
    LocationNotFound(String),

    /// Location is inactive and its respawn time has not passed.
    #[error("location {location_id} is still respawning until {respawn_time}")]
    StillRespawning {
        /// The location.
        location_id: String,
        /// Unix time (seconds) at which it comes back.
        respawn_time: u64,
    },

    /// Location is inactive but carries no respawn time.
    #[error("inactive location {0} has no respawn time")]
    MissingRespawnTime(String),

    /// Operation does not apply to this kind of location.
    #[error("{operation} is not possible at a {kind} location ({location_id})")]
    WrongKind {
        /// What was attempted.
        operation: &'static str,
        /// The location.
        location_id: String,
        /// Its kind.
        kind: String,
    },

    /// Loot table weights do not cover the roll.
    #[error("loot weights sum to {total}, below roll {roll}")]
    WeightsIncomplete {
        /// Sum of all entry weights.
        total: f64,
        /// The rolled value.
        roll: f64,
    },

    /// Loot table weights do not sum to one.
    #[error("loot table {table} weights sum to {total}, expected 1")]
    InvalidLootTable {
        /// Table name.
        table: String,
        /// Sum of all entry weights.
        total: f64,
    },

    /// Playable location cannot become a spawn location.
    #[error("invalid playable location: {0}")]
    InvalidPlayableLocation(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
