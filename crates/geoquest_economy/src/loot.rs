//! # Loot Tables
//!
//! Weighted drop tables rolled after battles and when opening chests.
//!
//! ## Roll
//!
//! A uniform `r` in `[0, 1)` is walked against the cumulative weights in
//! table order; the first entry whose running total reaches `r` drops. Weights
//! are probabilities and should sum to one: a table that sums lower can fail a
//! roll with `WeightsIncomplete`.

use geoquest_shared::constants::{
    BODY_ARMOR_TYPE_1, BODY_ARMOR_TYPE_2, BODY_ARMOR_TYPE_3, GOLD_KEY, HELMET_TYPE_1,
    HELMET_TYPE_2, HELMET_TYPE_3, SHIELD_TYPE_1, SHIELD_TYPE_2, SHIELD_TYPE_3, WEAPON_TYPE_1,
    WEAPON_TYPE_2, WEAPON_TYPE_3,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::inventory::Item;

/// Tolerance on the weight sum accepted by `validate`.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// A single entry in a loot table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// The item to drop.
    pub item_id: String,
    /// Drop probability.
    pub weight: f64,
    /// Minimum quantity.
    #[serde(default = "one")]
    pub min_quantity: u32,
    /// Maximum quantity.
    #[serde(default = "one")]
    pub max_quantity: u32,
}

const fn one() -> u32 {
    1
}

impl LootEntry {
    /// Creates an entry dropping exactly one item.
    #[must_use]
    pub fn single(item_id: &str, weight: f64) -> Self {
        Self {
            item_id: item_id.to_owned(),
            weight,
            min_quantity: 1,
            max_quantity: 1,
        }
    }
}

/// An ordered weighted table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    /// Entries, walked in order.
    #[serde(default)]
    pub entries: Vec<LootEntry>,
}

impl LootTable {
    /// Creates a table.
    #[must_use]
    pub fn new(entries: Vec<LootEntry>) -> Self {
        Self { entries }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Checks that weights are non-negative and sum to one, and that
    /// quantity ranges are ordered.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLootTable` naming `table`.
    pub fn validate(&self, table: &str) -> EconomyResult<()> {
        let total = self.total_weight();
        let bad_entry = self
            .entries
            .iter()
            .any(|e| !(e.weight >= 0.0) || e.min_quantity > e.max_quantity);
        if bad_entry || (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(EconomyError::InvalidLootTable {
                table: table.to_owned(),
                total,
            });
        }
        Ok(())
    }

    /// Rolls one drop.
    ///
    /// # Errors
    ///
    /// Returns `WeightsIncomplete` if the roll lands past the last entry.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> EconomyResult<Item> {
        let roll: f64 = rng.gen();
        let mut cumulative = 0.0;

        for entry in &self.entries {
            cumulative += entry.weight;
            if roll <= cumulative {
                let quantity = if entry.max_quantity > entry.min_quantity {
                    rng.gen_range(entry.min_quantity..=entry.max_quantity)
                } else {
                    entry.min_quantity
                };
                return Ok(Item::new(entry.item_id.clone(), quantity));
            }
        }

        Err(EconomyError::WeightsIncomplete {
            total: cumulative,
            roll,
        })
    }

    /// Drops after beating a minion.
    #[must_use]
    pub fn minion_battle() -> Self {
        Self::new(vec![
            LootEntry::single(HELMET_TYPE_1, 0.2),
            LootEntry::single(HELMET_TYPE_2, 0.05),
            LootEntry::single(BODY_ARMOR_TYPE_1, 0.2),
            LootEntry::single(BODY_ARMOR_TYPE_2, 0.05),
            LootEntry::single(SHIELD_TYPE_1, 0.2),
            LootEntry::single(SHIELD_TYPE_2, 0.05),
            LootEntry::single(WEAPON_TYPE_1, 0.2),
            LootEntry::single(WEAPON_TYPE_2, 0.05),
        ])
    }

    /// Drops after beating a tower's general.
    #[must_use]
    pub fn general_battle() -> Self {
        Self::new(vec![
            LootEntry::single(GOLD_KEY, 0.4),
            LootEntry::single(HELMET_TYPE_2, 0.1),
            LootEntry::single(HELMET_TYPE_3, 0.05),
            LootEntry::single(BODY_ARMOR_TYPE_2, 0.1),
            LootEntry::single(BODY_ARMOR_TYPE_3, 0.05),
            LootEntry::single(SHIELD_TYPE_2, 0.1),
            LootEntry::single(SHIELD_TYPE_3, 0.05),
            LootEntry::single(WEAPON_TYPE_2, 0.1),
            LootEntry::single(WEAPON_TYPE_3, 0.05),
        ])
    }

    /// Drops from an opened chest.
    #[must_use]
    pub fn chest() -> Self {
        Self::new(vec![
            LootEntry::single(HELMET_TYPE_1, 0.15),
            LootEntry::single(HELMET_TYPE_2, 0.07),
            LootEntry::single(HELMET_TYPE_3, 0.03),
            LootEntry::single(BODY_ARMOR_TYPE_1, 0.15),
            LootEntry::single(BODY_ARMOR_TYPE_2, 0.07),
            LootEntry::single(BODY_ARMOR_TYPE_3, 0.03),
            LootEntry::single(SHIELD_TYPE_1, 0.15),
            LootEntry::single(SHIELD_TYPE_2, 0.07),
            LootEntry::single(SHIELD_TYPE_3, 0.03),
            LootEntry::single(WEAPON_TYPE_1, 0.15),
            LootEntry::single(WEAPON_TYPE_2, 0.07),
            LootEntry::single(WEAPON_TYPE_3, 0.03),
        ])
    }
}

/// The three tables the rules roll against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootTables {
    /// Minion battle drops.
    pub minion: LootTable,
    /// General battle drops.
    pub general: LootTable,
    /// Chest drops.
    pub chest: LootTable,
}

impl Default for LootTables {
    fn default() -> Self {
        Self {
            minion: LootTable::minion_battle(),
            general: LootTable::general_battle(),
            chest: LootTable::chest(),
        }
    }
}

impl LootTables {
    /// Validates every table.
    ///
    /// # Errors
    ///
    /// Returns the first invalid table.
    pub fn validate(&self) -> EconomyResult<()> {
        self.minion.validate("minion")?;
        self.general.validate("general")?;
        self.chest.validate("chest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_tables_are_valid() {
        LootTables::default().validate().unwrap();
    }

    #[test]
    fn test_roll_is_deterministic_per_seed() {
        let table = LootTable::chest();
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            assert_eq!(table.roll(&mut a).unwrap(), table.roll(&mut b).unwrap());
        }
    }

    #[test]
    fn test_roll_only_yields_table_items() {
        let table = LootTable::general_battle();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..1_000 {
            let item = table.roll(&mut rng).unwrap();
            assert!(table.entries.iter().any(|e| e.item_id == item.id));
            assert_eq!(item.quantity, 1);
        }
    }

    #[test]
    fn test_roll_distribution_follows_weights() {
        let table = LootTable::new(vec![
            LootEntry::single("common", 0.9),
            LootEntry::single("rare", 0.1),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let rare = (0..10_000)
            .filter(|_| table.roll(&mut rng).unwrap().id == "rare")
            .count();
        assert!((800..1_200).contains(&rare), "rare drops: {rare}");
    }

    #[test]
    fn test_incomplete_weights_error() {
        let table = LootTable::new(vec![LootEntry::single("only", 0.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // Any roll above zero falls off the end
        let err = (0..10)
            .find_map(|_| table.roll(&mut rng).err())
            .unwrap();
        assert!(matches!(err, EconomyError::WeightsIncomplete { .. }));
        assert!(table.validate("only").is_err());
    }

    #[test]
    fn test_quantity_range() {
        let table = LootTable::new(vec![LootEntry {
            item_id: "gold_key".into(),
            weight: 1.0,
            min_quantity: 2,
            max_quantity: 4,
        }]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        for _ in 0..100 {
            let q = table.roll(&mut rng).unwrap().quantity;
            assert!((2..=4).contains(&q));
        }
    }
}
