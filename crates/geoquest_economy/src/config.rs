//! Economy configuration, loaded once at startup.
//!
//! ```toml
//! seed = 42
//!
//! [[loot.chest.entries]]
//! item_id = "helmet_1"
//! weight = 1.0
//! ```
//!
//! Tables left out keep their built-in defaults.

use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::loot::LootTables;

/// Economy settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Seed for the rules' RNG. Same seed, same drops.
    pub seed: u64,
    /// Loot tables.
    pub loot: LootTables,
}

impl EconomyConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on a parse error, `InvalidLootTable` on bad weights.
    pub fn from_toml_str(text: &str) -> EconomyResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        config.loot.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the file cannot be read, otherwise as
    /// `from_toml_str`.
    pub fn from_file(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EconomyError::InvalidConfig(format!("{}: {e}", path.display())))?;
        tracing::info!("Loading economy config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// A fresh RNG seeded from `seed`.
    #[must_use]
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}
