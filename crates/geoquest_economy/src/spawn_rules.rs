//! # Spawn Rules
//!
//! Turns raw playable locations into game spawn locations.
//!
//! ## Distribution
//!
//! ```text
//! roll 0..=100
//!   0 ..=  4  energy station   (~5%)
//!   5 ..= 24  chest            (~20%)
//!  25 ..= 39  tower            (~15%)
//!  40 ..=100  minion           (~60%)
//! ```

use geoquest_shared::constants::{DIAMOND_KEY, GOLD_KEY};
use geoquest_shared::{PlayableLocation, SpawnKind, SpawnLocation, WorldData};
use rand::Rng;

use crate::error::{EconomyError, EconomyResult};

/// Activation requirements attached to a new spawn location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindRules {
    /// Keys consumed to activate.
    pub keys_to_activate: u32,
    /// Key item id, if keys are needed.
    pub key_type: Option<&'static str>,
    /// Whether the location comes back after use.
    pub respawns: bool,
}

/// The spawn distribution.
pub struct SpawnRules;

impl SpawnRules {
    /// Highest roll value (inclusive).
    pub const MAX_ROLL: u32 = 100;

    /// Maps a roll in `0..=100` to a kind.
    #[must_use]
    pub const fn assign(roll: u32) -> SpawnKind {
        match roll {
            0..=4 => SpawnKind::EnergyStation,
            5..=24 => SpawnKind::Chest,
            25..=39 => SpawnKind::Tower,
            _ => SpawnKind::Minion,
        }
    }

    /// Default requirements for a kind.
    #[must_use]
    pub const fn rules_for(kind: SpawnKind) -> KindRules {
        match kind {
            SpawnKind::Chest => KindRules {
                keys_to_activate: 3,
                key_type: Some(GOLD_KEY),
                respawns: true,
            },
            SpawnKind::Tower => KindRules {
                keys_to_activate: 3,
                key_type: Some(DIAMOND_KEY),
                respawns: false,
            },
            SpawnKind::EnergyStation | SpawnKind::Minion => KindRules {
                keys_to_activate: 0,
                key_type: None,
                respawns: true,
            },
        }
    }
}

/// Creates a randomly typed spawn location on a playable location.
///
/// The id is the location name with `/` replaced by `_`. The snapped point
/// is used when present, the centre point otherwise.
///
/// # Errors
///
/// `InvalidPlayableLocation` if the name is empty or both points are absent.
pub fn create_spawn_location<R: Rng + ?Sized>(
    location: &PlayableLocation,
    rng: &mut R,
) -> EconomyResult<SpawnLocation> {
    if location.name.is_empty() {
        return Err(EconomyError::InvalidPlayableLocation(
            "location has no name".to_owned(),
        ));
    }
    let Some(point) = location.snapped_point.or(location.center_point) else {
        return Err(EconomyError::InvalidPlayableLocation(format!(
            "{} has no coordinates",
            location.name
        )));
    };

    let kind = SpawnRules::assign(rng.gen_range(0..=SpawnRules::MAX_ROLL));
    let rules = SpawnRules::rules_for(kind);

    let mut spawn = SpawnLocation::new(location.name.replace('/', "_"), kind, Some(point));
    spawn.keys_to_activate = rules.keys_to_activate;
    spawn.key_type = rules.key_type.map(str::to_owned);
    spawn.respawns = rules.respawns;
    Ok(spawn)
}

/// Adds a spawn location for every playable location not already in `world`.
///
/// Invalid playable locations are skipped. Returns the number added.
pub fn populate_world<R: Rng + ?Sized>(
    world: &mut WorldData,
    locations: &[PlayableLocation],
    rng: &mut R,
) -> usize {
    let mut added = 0;
    for location in locations {
        match create_spawn_location(location, rng) {
            Ok(spawn) => {
                if !world.locations.contains_key(&spawn.id) {
                    world.locations.insert(spawn.id.clone(), spawn);
                    added += 1;
                }
            }
            Err(e) => tracing::warn!("Skipping playable location: {}", e),
        }
    }
    tracing::debug!("Populated {} new spawn location(s)", added);
    added
}
