//! # World Controller
//!
//! Owns one game session: the startup gate, the spawned-object registry and
//! the session services. The host drives it through requests (via the
//! `host` traits) and callbacks (the `on_*` methods).
//!
//! ## Session Flow
//!
//! ```text
//! start_session ──> fetch reference / player data, load map
//!      │
//!      ├─ on_reference_data_loaded ─┐
//!      ├─ on_player_data_loaded ────┼─> gate ──> GameEvent::Ready
//!      ├─ on_map_loaded ────────────┤
//!      └─ on_world_data_loaded ─────┘  (only with wait_for_world_data)
//!               │
//!               └─> reconcile spawn locations around the avatar
//! ```
//!
//! Load failures emit `GameEvent::LoadingError` and leave the milestone
//! pending, so a retried load can still complete startup.

use std::collections::HashSet;

use geoquest_core::{
    Haversine, MilestoneId, ReconcileReport, SessionToken, SpawnRegistry, SpawnRenderer, Squasher,
    StartupGate,
};
use geoquest_economy::{
    BattleData, BattleSummary, EconomyResult, EnergyData, GameRules, LootTables, PlayerData,
    ReferenceData, RewardsData,
};
use geoquest_shared::{Bounds, FloatingOrigin, LatLng, SpawnLocation, WorldData, WorldDataRequest};
use rand::Rng;

use crate::config::WorldConfig;
use crate::error::{ConfigError, SessionError, SessionResult};
use crate::events::{EventSender, GameEvent};
use crate::host::{DataLoader, LoadError, StructureDecorator, StructureKind};
use crate::services::{PlayerService, ReferenceService, WorldService};

/// Session orchestrator. `H` is the host's spawned-object handle.
pub struct WorldController<H> {
    config: WorldConfig,
    gate: StartupGate<EventSender>,
    registry: SpawnRegistry<H>,
    reference: ReferenceService,
    player: PlayerService,
    world: WorldService,
    loot: LootTables,
    squasher: Squasher,
    events: EventSender,
    /// Set by the first location fix, never moved afterwards.
    origin: Option<FloatingOrigin>,
    avatar: LatLng,
    world_data_in_flight: bool,
}

impl<H> WorldController<H> {
    /// Creates an idle controller. Call `start_session` to begin.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is out of range.
    pub fn new(config: WorldConfig, events: EventSender) -> Result<Self, ConfigError> {
        config.validate()?;
        let squasher = Squasher::new(config.squash)?;

        Ok(Self {
            gate: StartupGate::new(events.clone()),
            registry: SpawnRegistry::new(),
            reference: ReferenceService::default(),
            player: PlayerService::default(),
            world: WorldService::default(),
            loot: LootTables::default(),
            squasher,
            events,
            origin: None,
            avatar: config.default_location,
            world_data_in_flight: false,
            config,
        })
    }

    /// Replaces the loot tables used by interactions.
    #[must_use]
    pub fn with_loot_tables(mut self, loot: LootTables) -> Self {
        self.loot = loot;
        self
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Arms the gate and issues every startup load.
    pub fn start_session<L: DataLoader>(&mut self, loader: &mut L) -> SessionToken {
        let session = self.gate.initialize(self.milestones(true));
        self.world_data_in_flight = false;

        loader.fetch_reference_data();
        loader.fetch_player_data();
        loader.load_map(self.avatar);

        self.gate.check_ready();
        session
    }

    /// Starts over with a fresh player and an empty world.
    ///
    /// Reference data is kept if already loaded. Every spawned object is
    /// destroyed and the gate re-armed.
    pub fn new_game<L, R>(&mut self, loader: &mut L, renderer: &mut R) -> SessionToken
    where
        L: DataLoader,
        R: SpawnRenderer<Handle = H>,
    {
        tracing::info!("New game requested");

        self.player.reset();
        self.world.clear();
        self.world_data_in_flight = false;
        for id in self.registry.clear(renderer) {
            self.events.send(GameEvent::EntityDespawned { id });
        }

        let reload_reference = !self.reference.is_initialized();
        let session = self.gate.initialize(self.milestones(reload_reference));

        if reload_reference {
            loader.fetch_reference_data();
        }
        loader.fetch_player_data();
        loader.load_map(self.avatar);

        self.gate.check_ready();
        session
    }

    fn milestones(&self, include_reference: bool) -> Vec<MilestoneId> {
        let mut milestones = Vec::with_capacity(4);
        if include_reference {
            milestones.push(MilestoneId::REFERENCE_DATA);
        }
        milestones.push(MilestoneId::PLAYER_DATA);
        milestones.push(MilestoneId::MAP_DATA);
        if self.config.wait_for_world_data {
            milestones.push(MilestoneId::PLAYABLE_LOCATIONS);
        }
        milestones
    }

    /// Reference data load finished.
    pub fn on_reference_data_loaded(&mut self, result: Result<ReferenceData, LoadError>) {
        match result {
            Ok(data) => {
                self.reference.init(data);
                self.gate.complete_and_check(&MilestoneId::REFERENCE_DATA);
            }
            Err(e) => self.gate.report_error(&e.message),
        }
    }

    /// Player data load finished.
    pub fn on_player_data_loaded(&mut self, result: Result<PlayerData, LoadError>) {
        match result {
            Ok(data) => {
                self.player.init(data);
                self.gate.complete_and_check(&MilestoneId::PLAYER_DATA);
            }
            Err(e) => self.gate.report_error(&e.message),
        }
    }

    /// The map finished loading.
    pub fn on_map_loaded(&mut self) {
        self.gate.complete_and_check(&MilestoneId::MAP_DATA);
    }

    /// A host load failed outside the typed callbacks.
    pub fn on_load_error(&mut self, message: &str) {
        self.gate.report_error(message);
    }

    /// Returns true once the current session signalled ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.gate.session().generation() > 0 && self.gate.is_started()
    }

    /// Current session.
    #[must_use]
    pub fn session(&self) -> SessionToken {
        self.gate.session()
    }

    /// The startup gate.
    #[must_use]
    pub const fn gate(&self) -> &StartupGate<EventSender> {
        &self.gate
    }

    // =========================================================================
    // Map Structures
    // =========================================================================

    /// A map structure was created. Buildings get a squasher.
    ///
    /// Returns whether one was attached.
    pub fn on_structure_created<D: StructureDecorator>(
        &self,
        decorator: &mut D,
        kind: StructureKind,
        structure: &mut D::Structure,
    ) -> bool {
        if !kind.is_building() {
            return false;
        }
        decorator.attach_squasher(structure, self.squasher);
        true
    }

    // =========================================================================
    // Location
    // =========================================================================

    /// Accepts a resolved location fix. The first valid fix becomes the
    /// floating origin.
    ///
    /// Returns true if this fix set the origin.
    pub fn set_location_fix(&mut self, fix: LatLng) -> bool {
        if !fix.is_valid() {
            tracing::warn!("Ignoring invalid location fix {}", fix);
            return false;
        }
        self.avatar = fix;
        if self.origin.is_some() {
            return false;
        }
        tracing::info!("Floating origin set to {}", fix);
        self.origin = Some(FloatingOrigin::new(fix));
        true
    }

    /// Avatar position used for visibility.
    #[must_use]
    pub const fn avatar(&self) -> LatLng {
        self.avatar
    }

    /// Floating origin, once set.
    #[must_use]
    pub const fn origin(&self) -> Option<FloatingOrigin> {
        self.origin
    }

    // =========================================================================
    // World Data
    // =========================================================================

    /// Builds a request for every spawn location within `max_distance`
    /// metres of `center`.
    ///
    /// Returns `None` while a previous request is in flight.
    pub fn request_world_data(&mut self, center: LatLng) -> Option<WorldDataRequest> {
        if self.world_data_in_flight {
            tracing::debug!("World data request already in flight");
            return None;
        }

        let projection = self.origin.unwrap_or_else(|| FloatingOrigin::new(center));
        let request =
            WorldDataRequest::from(Bounds::around(&projection, center, self.config.max_distance));

        self.world_data_in_flight = true;
        self.events.send(GameEvent::WorldDataRequested { request });
        Some(request)
    }

    /// Returns true while a world data request is outstanding.
    #[must_use]
    pub const fn is_world_data_loading(&self) -> bool {
        self.world_data_in_flight
    }

    /// The map started reloading around `avatar`. Issues a refresh when
    /// configured to.
    pub fn on_map_load_start(&mut self, avatar: LatLng) -> Option<WorldDataRequest> {
        self.avatar = avatar;
        if self.config.refresh_on_map_load {
            self.request_world_data(avatar)
        } else {
            None
        }
    }

    /// A world data batch arrived: store it and reconcile the spawned objects.
    pub fn on_world_data_loaded<R>(
        &mut self,
        world: WorldData,
        avatar: LatLng,
        renderer: &mut R,
    ) -> ReconcileReport
    where
        R: SpawnRenderer<Handle = H>,
    {
        self.world_data_in_flight = false;
        self.avatar = avatar;
        tracing::debug!("World data loaded: {} location(s)", world.len());
        self.world.init(world);

        let report = self.reconcile(renderer);
        self.gate.complete_and_check(&MilestoneId::PLAYABLE_LOCATIONS);
        report
    }

    /// A world data request failed.
    pub fn on_world_data_error(&mut self, message: &str) {
        self.world_data_in_flight = false;
        self.gate.report_error(message);
    }

    /// Re-evaluates visibility after the avatar moved, without new data.
    pub fn refresh_visibility<R>(&mut self, avatar: LatLng, renderer: &mut R) -> ReconcileReport
    where
        R: SpawnRenderer<Handle = H>,
    {
        self.avatar = avatar;
        self.reconcile(renderer)
    }

    fn reconcile<R>(&mut self, renderer: &mut R) -> ReconcileReport
    where
        R: SpawnRenderer<Handle = H>,
    {
        let entities = self.world.entities();
        let max_distance = self.config.max_distance;
        let plan = match &self.origin {
            Some(origin) => self.registry.plan(&entities, self.avatar, max_distance, origin),
            None => self.registry.plan(&entities, self.avatar, max_distance, &Haversine),
        };

        let membership_changed = plan.changes_membership();
        let flipped: HashSet<String> = plan
            .toggle
            .iter()
            .filter(|t| {
                self.registry
                    .get(&t.id)
                    .is_some_and(|entry| entry.visible != t.visible)
            })
            .map(|t| t.id.clone())
            .collect();
        let spawned: Vec<GameEvent> = plan
            .create
            .iter()
            .map(|c| GameEvent::EntitySpawned {
                id: c.entity.id.clone(),
                kind: c.entity.kind,
                position: c.position,
                visible: c.visible,
            })
            .collect();

        let report = self.registry.apply(plan, renderer);

        for id in &report.removed {
            self.events.send(GameEvent::EntityDespawned { id: id.clone() });
        }
        for event in spawned {
            self.events.send(event);
        }
        for (id, visible) in &report.toggled {
            if flipped.contains(id) {
                self.events.send(GameEvent::VisibilityChanged {
                    id: id.clone(),
                    visible: *visible,
                });
            }
        }

        if membership_changed {
            tracing::info!(
                "Spawn locations reconciled: {} live, {} visible",
                self.registry.len(),
                report.visible_count()
            );
        } else {
            tracing::debug!(
                "Spawn visibility refreshed: {} visible",
                report.visible_count()
            );
        }
        report
    }

    /// Live spawned objects.
    #[must_use]
    pub const fn registry(&self) -> &SpawnRegistry<H> {
        &self.registry
    }

    // =========================================================================
    // Interactions
    // =========================================================================

    /// Opens the chest at `location_id`.
    ///
    /// # Errors
    ///
    /// Data not loaded, unknown location, or a rule rejection.
    pub fn open_chest<R: Rng + ?Sized>(
        &mut self,
        location_id: &str,
        rng: &mut R,
        now: u64,
    ) -> SessionResult<RewardsData> {
        self.with_rules(location_id, |rules, player, location| {
            rules.open_chest(player, location, rng, now)
        })
    }

    /// Uses the energy station at `location_id`.
    ///
    /// # Errors
    ///
    /// Data not loaded, unknown location, or a rule rejection.
    pub fn use_energy_station(&mut self, location_id: &str, now: u64) -> SessionResult<EnergyData> {
        self.with_rules(location_id, |rules, player, location| {
            rules.use_energy_station(player, location, now)
        })
    }

    /// Sets up a battle at `location_id`.
    ///
    /// # Errors
    ///
    /// Data not loaded, unknown location, or a rule rejection.
    pub fn start_battle<R: Rng + ?Sized>(
        &mut self,
        location_id: &str,
        rng: &mut R,
        now: u64,
    ) -> SessionResult<BattleData> {
        self.with_rules(location_id, |rules, player, location| {
            rules.prepare_battle(player, location, rng, now)
        })
    }

    /// Settles the battle at `location_id`.
    ///
    /// # Errors
    ///
    /// Data not loaded, unknown location, or a rule rejection.
    pub fn finish_battle<R: Rng + ?Sized>(
        &mut self,
        location_id: &str,
        winner: bool,
        rng: &mut R,
        now: u64,
    ) -> SessionResult<BattleSummary> {
        self.with_rules(location_id, |rules, player, location| {
            rules.resolve_battle(player, location, winner, rng, now)
        })
    }

    fn with_rules<T>(
        &mut self,
        location_id: &str,
        action: impl FnOnce(GameRules<'_>, &mut PlayerData, &mut SpawnLocation) -> EconomyResult<T>,
    ) -> SessionResult<T> {
        let reference = self
            .reference
            .data()
            .ok_or(SessionError::ReferenceDataNotLoaded)?;
        let location = self
            .world
            .spawn_location_mut(location_id)
            .ok_or_else(|| SessionError::UnknownLocation(location_id.to_owned()))?;
        let player = self
            .player
            .data_mut()
            .ok_or(SessionError::PlayerDataNotLoaded)?;

        Ok(action(GameRules::new(reference, &self.loot), player, location)?)
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Loaded reference data.
    #[must_use]
    pub const fn reference(&self) -> &ReferenceService {
        &self.reference
    }

    /// Loaded player data.
    #[must_use]
    pub const fn player(&self) -> &PlayerService {
        &self.player
    }

    /// Latest world data.
    #[must_use]
    pub const fn world(&self) -> &WorldService {
        &self.world
    }

    /// Session settings.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }
}
