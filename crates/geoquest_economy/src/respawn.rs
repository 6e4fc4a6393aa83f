//! Respawn timers on spawn locations.
//!
//! Times are unix seconds supplied by the caller; nothing here reads a clock.

use geoquest_shared::SpawnLocation;

use crate::error::{EconomyError, EconomyResult};

/// Active/respawning state of a location.
pub trait RespawnState {
    /// Reactivates the location if its respawn time has passed.
    ///
    /// # Errors
    ///
    /// `StillRespawning` if the time is in the future, `MissingRespawnTime`
    /// if the location is inactive without one.
    fn check(&mut self, now: u64) -> EconomyResult<()>;

    /// Deactivates the location for `duration` seconds. `None` leaves it
    /// active, for objects that do not respawn.
    fn start_respawn(&mut self, now: u64, duration: Option<u64>);

    /// Returns true while inactive and not yet due.
    fn is_respawning(&self, now: u64) -> bool;
}

impl RespawnState for SpawnLocation {
    fn check(&mut self, now: u64) -> EconomyResult<()> {
        if self.active {
            return Ok(());
        }
        match self.respawn_time {
            None => Err(EconomyError::MissingRespawnTime(self.id.clone())),
            Some(t) if t > now => Err(EconomyError::StillRespawning {
                location_id: self.id.clone(),
                respawn_time: t,
            }),
            Some(_) => {
                tracing::debug!("Location {} respawned", self.id);
                self.active = true;
                self.respawn_time = None;
                Ok(())
            }
        }
    }

    fn start_respawn(&mut self, now: u64, duration: Option<u64>) {
        if let Some(duration) = duration {
            self.active = false;
            self.respawn_time = Some(now.saturating_add(duration));
        }
    }

    fn is_respawning(&self, now: u64) -> bool {
        !self.active && self.respawn_time.map_or(true, |t| t > now)
    }
}
