//! # GEOQUEST Economy System
//!
//! The game rules behind the spawn locations.
//!
//! ## Design Principles
//!
//! 1. **Injected randomness** - every roll takes an `Rng`; seeded `ChaCha8Rng` makes runs reproducible
//! 2. **Check, then mutate** - a failed interaction leaves the player and the location as they were
//! 3. **Caller-supplied time** - respawn timers take `now` in unix seconds
//! 4. **External configuration** - loot tables can be overridden from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use geoquest_economy::{EconomyConfig, GameRules, PlayerData};
//!
//! let config = EconomyConfig::from_file("data/economy.toml")?;
//! let rules = GameRules::new(&reference_data, &config.loot);
//! let mut rng = config.rng();
//!
//! let mut player = PlayerData::new_player();
//! let rewards = rules.open_chest(&mut player, &mut location, &mut rng, now)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod inventory;
pub mod loot;
pub mod player;
pub mod reference;
pub mod respawn;
pub mod rewards;
pub mod spawn_rules;
pub mod systems;

pub use config::EconomyConfig;
pub use error::{EconomyError, EconomyResult};
pub use inventory::{Inventory, Item, ItemDelta};
pub use loot::{LootEntry, LootTable, LootTables};
pub use player::PlayerData;
pub use reference::{ReferenceData, ReferenceItem};
pub use respawn::RespawnState;
pub use rewards::{
    chest_rewards, general_battle_rewards, lost_battle_penalty, minion_battle_rewards,
    RewardsData,
};
pub use spawn_rules::{create_spawn_location, populate_world, KindRules, SpawnRules};
pub use systems::{BattleData, BattleSummary, EnergyData, GameRules};
