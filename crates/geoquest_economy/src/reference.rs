//! Reference data: the server's catalogue of every game object.
//!
//! Ids referenced by items, spawn locations and loot tables are all looked up
//! here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};

/// Catalogue entry for one game object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceItem {
    /// Unique id.
    #[serde(rename = "itemId")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category, e.g. `weapon` or `location_object`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Flavour text.
    pub description: String,
    /// Seconds a location of this type stays inactive after use.
    #[serde(rename = "respawnDuration")]
    pub respawn_duration: Option<u64>,
    /// Seconds between attacks in battle.
    pub cooldown: Option<u64>,
    /// Attack bonus when equipped.
    #[serde(rename = "attackScore")]
    pub attack_score: u32,
    /// Defense bonus when equipped.
    #[serde(rename = "defenseScore")]
    pub defense_score: u32,
    /// Maximum stack size, zero for unlimited.
    #[serde(rename = "maxStack")]
    pub max_stack: u32,
}

impl ReferenceItem {
    /// Creates an entry with only an id and a respawn duration.
    #[must_use]
    pub fn new(id: impl Into<String>, respawn_duration: Option<u64>) -> Self {
        Self {
            id: id.into(),
            respawn_duration,
            ..Self::default()
        }
    }
}

impl fmt::Display for ReferenceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.id, self.kind, self.name)
    }
}

/// The full catalogue.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Every entry.
    #[serde(default)]
    pub references: Vec<ReferenceItem>,
}

impl ReferenceData {
    /// Builds a catalogue.
    #[must_use]
    pub fn new(references: Vec<ReferenceItem>) -> Self {
        Self { references }
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ReferenceItem> {
        self.references.iter().find(|r| r.id == id)
    }

    /// Looks up an entry that the rules cannot do without.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceItemNotFound` if absent.
    pub fn require(&self, id: &str) -> EconomyResult<&ReferenceItem> {
        self.get(id)
            .ok_or_else(|| EconomyError::ReferenceItemNotFound(id.to_owned()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Returns true if the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl fmt::Display for ReferenceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.references {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}
