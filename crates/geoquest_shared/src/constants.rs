//! # Game Constants
//!
//! Values the client and the game rules must agree on.

use crate::math::LatLng;

// =============================================================================
// GEODESY
// =============================================================================

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Location used when no GPS fix is available (Mountain View, CA).
pub const DEFAULT_LOCATION: LatLng = LatLng::new(37.422_065, -122.084_049);

// =============================================================================
// WORLD STREAMING
// =============================================================================

/// Radius (metres) around the avatar inside which spawn locations are shown.
pub const DEFAULT_MAX_DISTANCE_M: f64 = 500.0;

/// Distance inside which buildings are fully squashed.
pub const DEFAULT_SQUASH_NEAR_M: f32 = 50.0;

/// Distance outside which buildings are left untouched.
pub const DEFAULT_SQUASH_FAR_M: f32 = 200.0;

/// Vertical scale applied at maximum squashing.
pub const DEFAULT_MAXIMUM_SQUASH: f32 = 0.1;

// =============================================================================
// ITEM IDENTIFIERS
// =============================================================================
// Foreign keys into the reference data served by the game server.

/// Gold key, opens chests.
pub const GOLD_KEY: &str = "gold_key";
/// Diamond key, unlocks towers.
pub const DIAMOND_KEY: &str = "diamond_key";
/// Freed leader, collecting enough wins the game.
pub const FREED_LEADERS: &str = "freed_leader";

/// Spawn kind: tower (guarded by a general).
pub const TOWER: &str = "tower";
/// Spawn kind: minion.
pub const MINION: &str = "minion";
/// Spawn kind: treasure chest.
pub const CHEST: &str = "chest";
/// Spawn kind: energy station.
pub const ENERGY_STATION: &str = "energy_station";
/// Opponent type guarding a tower.
pub const GENERAL: &str = "general";

/// Starter body armor.
pub const BODY_ARMOR_TYPE_1: &str = "body_armor_1";
/// Mid-tier body armor.
pub const BODY_ARMOR_TYPE_2: &str = "body_armor_2";
/// Top-tier body armor.
pub const BODY_ARMOR_TYPE_3: &str = "body_armor_3";
/// Starter helmet.
pub const HELMET_TYPE_1: &str = "helmet_1";
/// Mid-tier helmet.
pub const HELMET_TYPE_2: &str = "helmet_2";
/// Top-tier helmet.
pub const HELMET_TYPE_3: &str = "helmet_3";
/// Starter shield.
pub const SHIELD_TYPE_1: &str = "shield_1";
/// Mid-tier shield.
pub const SHIELD_TYPE_2: &str = "shield_2";
/// Top-tier shield.
pub const SHIELD_TYPE_3: &str = "shield_3";
/// Starter weapon.
pub const WEAPON_TYPE_1: &str = "weapon_1";
/// Mid-tier weapon.
pub const WEAPON_TYPE_2: &str = "weapon_2";
/// Top-tier weapon.
pub const WEAPON_TYPE_3: &str = "weapon_3";

/// Playable character types granted to every new player.
pub const CHARACTER_TYPES: [&str; 4] = ["character_1", "character_2", "character_3", "character_4"];

// =============================================================================
// PLAYER DEFAULTS
// =============================================================================

/// Name given to a freshly created player.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Energy level of a freshly created player (also its maximum).
pub const DEFAULT_PLAYER_ENERGY_LEVEL: u32 = 100;

/// Freed leaders needed to win the game.
pub const FREED_LEADERS_TO_WIN: u32 = 3;
