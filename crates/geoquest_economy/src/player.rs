//! Player profile and inventory.

use geoquest_shared::constants::{
    BODY_ARMOR_TYPE_1, CHARACTER_TYPES, DEFAULT_PLAYER_ENERGY_LEVEL, DEFAULT_PLAYER_NAME,
    FREED_LEADERS, FREED_LEADERS_TO_WIN, WEAPON_TYPE_1,
};
use serde::{Deserialize, Serialize};

use crate::inventory::{Inventory, Item};

/// Everything the server stores about a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Display name.
    pub name: String,
    /// Selected character type.
    pub character_type: String,
    /// Current energy.
    pub energy_level: u32,
    /// Energy cap.
    pub max_energy_level: u32,
    /// Equipped body armor.
    #[serde(default)]
    pub equipped_body_armor: Option<String>,
    /// Equipped helmet.
    #[serde(default)]
    pub equipped_helmet: Option<String>,
    /// Equipped shield.
    #[serde(default)]
    pub equipped_shield: Option<String>,
    /// Equipped weapon.
    #[serde(default)]
    pub equipped_weapon: Option<String>,
    /// Items held.
    #[serde(default)]
    pub inventory: Inventory,
}

impl PlayerData {
    /// A fresh player with the starter kit equipped and every character type
    /// unlocked.
    #[must_use]
    pub fn new_player() -> Self {
        let mut items = vec![Item::new(BODY_ARMOR_TYPE_1, 1), Item::new(WEAPON_TYPE_1, 1)];
        items.extend(CHARACTER_TYPES.iter().map(|c| Item::new(*c, 1)));

        Self {
            name: DEFAULT_PLAYER_NAME.to_owned(),
            character_type: CHARACTER_TYPES[0].to_owned(),
            energy_level: DEFAULT_PLAYER_ENERGY_LEVEL,
            max_energy_level: DEFAULT_PLAYER_ENERGY_LEVEL,
            equipped_body_armor: Some(BODY_ARMOR_TYPE_1.to_owned()),
            equipped_helmet: None,
            equipped_shield: None,
            equipped_weapon: Some(WEAPON_TYPE_1.to_owned()),
            inventory: Inventory::from_items(items),
        }
    }

    /// Leaders freed so far.
    #[must_use]
    pub fn freed_leaders(&self) -> u32 {
        self.inventory.quantity_of(FREED_LEADERS)
    }

    /// Returns true once enough leaders are freed.
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.freed_leaders() >= FREED_LEADERS_TO_WIN
    }

    /// Refills energy to the cap. Returns the amount restored.
    pub fn refill_energy(&mut self) -> u32 {
        let restored = self.max_energy_level.saturating_sub(self.energy_level);
        self.energy_level = self.max_energy_level;
        restored
    }
}

impl Default for PlayerData {
    fn default() -> Self {
        Self::new_player()
    }
}
