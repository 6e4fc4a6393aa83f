//! Session configuration.
//!
//! ```toml
//! max_distance = 500.0
//! wait_for_world_data = true
//!
//! [squash]
//! near = 50.0
//! far = 200.0
//! maximum_squash = 0.1
//!
//! [default_location]
//! latitude = 37.422065
//! longitude = -122.084049
//! ```
//!
//! Every key is optional.

use std::path::Path;

use geoquest_core::{CoreError, SquashConfig};
use geoquest_shared::constants::{DEFAULT_LOCATION, DEFAULT_MAX_DISTANCE_M};
use geoquest_shared::LatLng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Session settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Radius in metres inside which spawn locations are visible, and half
    /// the side of the world data request box.
    pub max_distance: f64,
    /// Building squash parameters.
    pub squash: SquashConfig,
    /// Hold the ready signal until the first world data batch is reconciled.
    pub wait_for_world_data: bool,
    /// Request world data whenever the map starts reloading.
    pub refresh_on_map_load: bool,
    /// Event channel capacity.
    pub event_capacity: usize,
    /// Avatar position until the first location fix.
    pub default_location: LatLng,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE_M,
            squash: SquashConfig::default(),
            wait_for_world_data: false,
            refresh_on_map_load: true,
            event_capacity: 1024,
            default_location: DEFAULT_LOCATION,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `Parse` on malformed input, otherwise as `validate`.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as `from_toml_str`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loading world config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// The first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_distance.is_finite() && self.max_distance >= 0.0) {
            return Err(CoreError::InvalidRadius(self.max_distance).into());
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "event_capacity",
                reason: "must be at least 1".to_owned(),
            });
        }
        if !self.default_location.is_valid() {
            return Err(ConfigError::Invalid {
                field: "default_location",
                reason: format!("{} is not a valid coordinate", self.default_location),
            });
        }
        self.squash.validate()?;
        Ok(())
    }
}
