//! # Inventory System
//!
//! Items are stacked by id: an inventory holds at most one entry per item id,
//! and an entry whose quantity drops to zero is removed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};

/// A quantity of one item type.
///
/// The id is a foreign key into the reference data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Reference data identifier.
    #[serde(rename = "itemId")]
    pub id: String,
    /// Quantity owned.
    pub quantity: u32,
}

impl Item {
    /// Creates an item.
    #[must_use]
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Type: {} Quantity: {}}}", self.id, self.quantity)
    }
}

/// A signed change to an inventory, as reported in rewards.
///
/// A lost key is reported with quantity `-1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDelta {
    /// Reference data identifier.
    #[serde(rename = "itemId")]
    pub id: String,
    /// Signed quantity.
    pub quantity: i64,
}

impl ItemDelta {
    /// Creates a delta.
    #[must_use]
    pub fn new(id: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

impl From<Item> for ItemDelta {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            quantity: i64::from(item.quantity),
        }
    }
}

impl fmt::Display for ItemDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Type: {} Quantity: {}}}", self.id, self.quantity)
    }
}

/// A player's items, in acquisition order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory, stacking repeated ids.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut inventory = Self::new();
        for item in items {
            inventory.add(&item.id, item.quantity);
        }
        inventory
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over held items.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Quantity held of `id`, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.find(id).map_or(0, |i| self.items[i].quantity)
    }

    /// Returns true if at least one `id` is held.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.quantity_of(id) > 0
    }

    /// Items whose id starts with `prefix`, e.g. every helmet.
    pub fn items_of<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |i| i.id.starts_with(prefix))
    }

    /// Adds `quantity` of `id`, stacking onto an existing entry.
    pub fn add(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.find(id) {
            Some(i) => {
                let item = &mut self.items[i];
                item.quantity = item.quantity.saturating_add(quantity);
            }
            None => self.items.push(Item::new(id, quantity)),
        }
    }

    /// Removes `quantity` of `id`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientItems` if fewer are held; nothing is removed then.
    pub fn remove(&mut self, id: &str, quantity: u32) -> EconomyResult<()> {
        let available = self.quantity_of(id);
        if available < quantity {
            return Err(EconomyError::InsufficientItems {
                item_id: id.to_owned(),
                required: quantity,
                available,
            });
        }
        self.take(id, quantity);
        Ok(())
    }

    /// Applies a reward delta. Negative deltas remove at most what is held.
    ///
    /// Returns the signed amount actually applied.
    pub fn apply(&mut self, delta: &ItemDelta) -> i64 {
        let magnitude = u32::try_from(delta.quantity.unsigned_abs()).unwrap_or(u32::MAX);
        if delta.quantity >= 0 {
            self.add(&delta.id, magnitude);
            i64::from(magnitude)
        } else {
            -i64::from(self.take(&delta.id, magnitude))
        }
    }

    /// Removes up to `quantity`, dropping the entry at zero. Returns the
    /// amount taken.
    fn take(&mut self, id: &str, quantity: u32) -> u32 {
        let Some(i) = self.find(id) else {
            return 0;
        };
        let held = self.items[i].quantity;
        let taken = quantity.min(held);
        if taken == held {
            self.items.remove(i);
        } else {
            self.items[i].quantity = held - taken;
        }
        taken
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }
}
