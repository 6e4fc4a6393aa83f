//! Reward bundles.
//!
//! Each bundle is a fixed grant followed by a number of loot rolls.

use geoquest_shared::constants::{DIAMOND_KEY, FREED_LEADERS, GOLD_KEY};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EconomyResult;
use crate::inventory::{Inventory, ItemDelta};
use crate::loot::{LootTable, LootTables};

/// What a player gained or lost at a location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsData {
    /// Location the rewards came from.
    #[serde(default)]
    pub id: Option<String>,
    /// Signed item changes.
    #[serde(default)]
    pub items: Vec<ItemDelta>,
}

impl RewardsData {
    /// Applies every change to `inventory`.
    pub fn apply_to(&self, inventory: &mut Inventory) {
        for delta in &self.items {
            inventory.apply(delta);
        }
    }

    /// Net change for one item id.
    #[must_use]
    pub fn net(&self, id: &str) -> i64 {
        self.items
            .iter()
            .filter(|d| d.id == id)
            .map(|d| d.quantity)
            .sum()
    }
}

fn bundle<R: Rng + ?Sized>(
    grant: &str,
    table: &LootTable,
    rolls: usize,
    rng: &mut R,
) -> EconomyResult<RewardsData> {
    let mut items = Vec::with_capacity(rolls + 1);
    items.push(ItemDelta::new(grant, 1));
    for _ in 0..rolls {
        items.push(table.roll(rng)?.into());
    }
    Ok(RewardsData { id: None, items })
}

/// One gold key and one minion-table roll.
///
/// # Errors
///
/// Propagates a failed loot roll.
pub fn minion_battle_rewards<R: Rng + ?Sized>(
    tables: &LootTables,
    rng: &mut R,
) -> EconomyResult<RewardsData> {
    bundle(GOLD_KEY, &tables.minion, 1, rng)
}

/// One freed leader and two general-table rolls.
///
/// # Errors
///
/// Propagates a failed loot roll.
pub fn general_battle_rewards<R: Rng + ?Sized>(
    tables: &LootTables,
    rng: &mut R,
) -> EconomyResult<RewardsData> {
    bundle(FREED_LEADERS, &tables.general, 2, rng)
}

/// One diamond key and two chest-table rolls.
///
/// # Errors
///
/// Propagates a failed loot roll.
pub fn chest_rewards<R: Rng + ?Sized>(
    tables: &LootTables,
    rng: &mut R,
) -> EconomyResult<RewardsData> {
    bundle(DIAMOND_KEY, &tables.chest, 2, rng)
}

/// The penalty for losing a battle: one gold key.
#[must_use]
pub fn lost_battle_penalty() -> RewardsData {
    RewardsData {
        id: None,
        items: vec![ItemDelta::new(GOLD_KEY, -1)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_bundle_shapes() {
        let tables = LootTables::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let minion = minion_battle_rewards(&tables, &mut rng).unwrap();
        assert_eq!(minion.items.len(), 2);
        assert_eq!(minion.items[0], ItemDelta::new(GOLD_KEY, 1));

        let general = general_battle_rewards(&tables, &mut rng).unwrap();
        assert_eq!(general.items.len(), 3);
        assert_eq!(general.net(FREED_LEADERS), 1);

        let chest = chest_rewards(&tables, &mut rng).unwrap();
        assert_eq!(chest.items.len(), 3);
        assert_eq!(chest.items[0], ItemDelta::new(DIAMOND_KEY, 1));
    }

    #[test]
    fn test_penalty_applies_once() {
        let mut inv = Inventory::new();
        inv.add(GOLD_KEY, 2);
        lost_battle_penalty().apply_to(&mut inv);
        assert_eq!(inv.quantity_of(GOLD_KEY), 1);
    }
}
