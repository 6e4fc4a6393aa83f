//! # Location Interactions
//!
//! What happens when a player uses a spawn location.
//!
//! ## The Interaction Pipeline
//!
//! ```text
//! Player taps location -> GameRules::<action>() ->
//!   1. Check the location kind
//!   2. Check respawn state (reactivate if due)
//!   3. Check and consume keys
//!   4. Roll rewards / refill energy
//!   5. Update inventory
//!   6. Start the respawn timer
//! ```
//!
//! A failed check leaves player and location untouched.

use geoquest_shared::constants::{DIAMOND_KEY, GENERAL, GOLD_KEY, MINION};
use geoquest_shared::{SpawnKind, SpawnLocation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::loot::LootTables;
use crate::player::PlayerData;
use crate::reference::ReferenceData;
use crate::respawn::RespawnState;
use crate::rewards::{
    chest_rewards, general_battle_rewards, lost_battle_penalty, minion_battle_rewards,
    RewardsData,
};

/// Energy restored at a station.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyData {
    /// Station location id.
    pub id: String,
    /// Points restored.
    pub amount_restored: u32,
}

/// Setup of a battle about to start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleData {
    /// Location id.
    pub id: String,
    /// Opponent reference id (`minion` or `general`).
    pub opponent_type_id: String,
    /// Whether the player moves first.
    pub player_starts: bool,
    /// Opponent cooldown in seconds.
    pub cooldown: Option<u64>,
}

/// Outcome of a finished battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    /// Whether the player won.
    pub winner: bool,
    /// Whether this win ended the game.
    pub won_the_game: bool,
    /// Items gained or lost.
    pub rewards: RewardsData,
}

/// The game rules over a catalogue and a set of loot tables.
#[derive(Clone, Copy, Debug)]
pub struct GameRules<'a> {
    /// Server catalogue.
    pub reference: &'a ReferenceData,
    /// Loot tables.
    pub loot: &'a LootTables,
}

impl<'a> GameRules<'a> {
    /// Creates the rules.
    #[must_use]
    pub const fn new(reference: &'a ReferenceData, loot: &'a LootTables) -> Self {
        Self { reference, loot }
    }

    /// Opens a chest: consumes its keys, rolls the chest rewards and starts
    /// the respawn.
    ///
    /// # Errors
    ///
    /// `WrongKind` for non-chests, respawn errors, missing reference data,
    /// `NotEnoughResources` when short of keys, or a failed loot roll.
    pub fn open_chest<R: Rng + ?Sized>(
        &self,
        player: &mut PlayerData,
        location: &mut SpawnLocation,
        rng: &mut R,
        now: u64,
    ) -> EconomyResult<RewardsData> {
        expect_kind(location, "open_chest", &[SpawnKind::Chest])?;
        location.check(now)?;
        let chest = self.reference.require(SpawnKind::Chest.item_id())?;
        let key_type = location.key_type.as_deref().unwrap_or(GOLD_KEY);
        self.reference.require(key_type)?;

        let mut rewards = chest_rewards(self.loot, rng)?;
        consume_keys(player, location, key_type)?;
        location.start_respawn(now, chest.respawn_duration);

        rewards.apply_to(&mut player.inventory);
        rewards.id = Some(location.id.clone());
        tracing::info!("Chest {} opened: {} item(s)", location.id, rewards.items.len());
        Ok(rewards)
    }

    /// Refills the player's energy and starts the station's respawn.
    ///
    /// # Errors
    ///
    /// `WrongKind` for non-stations, respawn errors, or missing reference
    /// data.
    pub fn use_energy_station(
        &self,
        player: &mut PlayerData,
        location: &mut SpawnLocation,
        now: u64,
    ) -> EconomyResult<EnergyData> {
        expect_kind(location, "use_energy_station", &[SpawnKind::EnergyStation])?;
        location.check(now)?;
        let station = self.reference.require(SpawnKind::EnergyStation.item_id())?;

        let amount_restored = player.refill_energy();
        location.start_respawn(now, station.respawn_duration);

        tracing::debug!("Energy station {} restored {}", location.id, amount_restored);
        Ok(EnergyData {
            id: location.id.clone(),
            amount_restored,
        })
    }

    /// Checks prerequisites and sets up a battle. Towers consume their
    /// diamond keys here and stay unlocked afterwards.
    ///
    /// # Errors
    ///
    /// `WrongKind` unless the location is a minion or a tower, respawn
    /// errors, missing reference data, or `NotEnoughResources`.
    pub fn prepare_battle<R: Rng + ?Sized>(
        &self,
        player: &mut PlayerData,
        location: &mut SpawnLocation,
        rng: &mut R,
        now: u64,
    ) -> EconomyResult<BattleData> {
        expect_kind(location, "battle", &[SpawnKind::Minion, SpawnKind::Tower])?;

        let opponent = if location.kind == SpawnKind::Minion {
            location.check(now)?;
            self.reference.require(MINION)?
        } else {
            let general = self.reference.require(GENERAL)?;
            self.reference.require(SpawnKind::Tower.item_id())?;
            let key_type = location.key_type.clone().unwrap_or_else(|| DIAMOND_KEY.to_owned());
            self.reference.require(&key_type)?;
            consume_keys(player, location, &key_type)?;
            location.keys_to_activate = 0;
            general
        };

        Ok(BattleData {
            id: location.id.clone(),
            opponent_type_id: opponent.id.clone(),
            player_starts: rng.gen(),
            cooldown: opponent.cooldown,
        })
    }

    /// Settles a battle. A win grants the minion or general bundle, a loss
    /// costs one gold key if the player has one. The location starts
    /// respawning either way.
    ///
    /// # Errors
    ///
    /// `WrongKind` unless the location is a minion or a tower, respawn
    /// errors, missing reference data, or a failed loot roll.
    pub fn resolve_battle<R: Rng + ?Sized>(
        &self,
        player: &mut PlayerData,
        location: &mut SpawnLocation,
        winner: bool,
        rng: &mut R,
        now: u64,
    ) -> EconomyResult<BattleSummary> {
        expect_kind(location, "battle", &[SpawnKind::Minion, SpawnKind::Tower])?;
        location.check(now)?;
        let reference = self.reference.require(location.kind.item_id())?;

        let mut rewards = match (winner, location.kind) {
            (true, SpawnKind::Minion) => minion_battle_rewards(self.loot, rng)?,
            (true, _) => general_battle_rewards(self.loot, rng)?,
            (false, _) => lost_battle_penalty(),
        };
        rewards.apply_to(&mut player.inventory);
        rewards.id = Some(location.id.clone());

        let won_the_game = winner && player.has_won();
        location.start_respawn(now, reference.respawn_duration);

        tracing::info!(
            "Battle at {} {}{}",
            location.id,
            if winner { "won" } else { "lost" },
            if won_the_game { ", game won" } else { "" }
        );

        Ok(BattleSummary {
            winner,
            won_the_game,
            rewards,
        })
    }
}

fn expect_kind(
    location: &SpawnLocation,
    operation: &'static str,
    kinds: &[SpawnKind],
) -> EconomyResult<()> {
    if kinds.contains(&location.kind) {
        Ok(())
    } else {
        Err(EconomyError::WrongKind {
            operation,
            location_id: location.id.clone(),
            kind: location.kind.to_string(),
        })
    }
}

fn consume_keys(
    player: &mut PlayerData,
    location: &SpawnLocation,
    key_type: &str,
) -> EconomyResult<()> {
    let required = location.keys_to_activate;
    let available = player.inventory.quantity_of(key_type);
    if available < required {
        return Err(EconomyError::NotEnoughResources {
            location_id: location.id.clone(),
            key_type: key_type.to_owned(),
            required,
            available,
        });
    }
    player.inventory.remove(key_type, required)
}
