//! Proximity squash.
//!
//! Host-created structures near the avatar are flattened so they do not block
//! the view. The vertical scale is `maximum_squash` at or inside `near`, `1.0`
//! at or beyond `far`, and linear in between.

use geoquest_shared::constants::{
    DEFAULT_MAXIMUM_SQUASH, DEFAULT_SQUASH_FAR_M, DEFAULT_SQUASH_NEAR_M,
};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Squash parameters, in world metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquashConfig {
    /// Distance at or below which structures are fully squashed.
    pub near: f32,
    /// Distance at or beyond which structures are not squashed.
    pub far: f32,
    /// Vertical scale applied at full squash.
    pub maximum_squash: f32,
}

impl Default for SquashConfig {
    fn default() -> Self {
        Self {
            near: DEFAULT_SQUASH_NEAR_M,
            far: DEFAULT_SQUASH_FAR_M,
            maximum_squash: DEFAULT_MAXIMUM_SQUASH,
        }
    }
}

impl SquashConfig {
    /// Checks `0 <= near < far` and `0 < maximum_squash <= 1`.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.near >= 0.0 && self.near < self.far) {
            return Err(CoreError::InvalidSquashRange {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.maximum_squash > 0.0 && self.maximum_squash <= 1.0) {
            return Err(CoreError::InvalidSquashFactor(self.maximum_squash));
        }
        Ok(())
    }
}

/// Computes vertical scale from distance to the avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Squasher {
    config: SquashConfig,
}

impl Squasher {
    /// Creates a squasher from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are out of range.
    pub fn new(config: SquashConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parameters in use.
    #[must_use]
    pub const fn config(&self) -> SquashConfig {
        self.config
    }

    /// Vertical scale for a structure `distance` metres from the avatar.
    #[must_use]
    pub fn vertical_scale(&self, distance: f32) -> f32 {
        let SquashConfig {
            near,
            far,
            maximum_squash,
        } = self.config;

        if distance <= near {
            return maximum_squash;
        }
        if distance >= far {
            return 1.0;
        }
        let t = (distance - near) / (far - near);
        maximum_squash + (1.0 - maximum_squash) * t
    }
}

impl Default for Squasher {
    fn default() -> Self {
        Self {
            config: SquashConfig::default(),
        }
    }
}
