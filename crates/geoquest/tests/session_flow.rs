//! End-to-end session flows through the controller with a fake host.

use geoquest::core::SpawnEntity;
use geoquest::economy::{EconomyError, PlayerData, ReferenceData, ReferenceItem};
use geoquest::shared::constants::{CHEST, GOLD_KEY};
use geoquest::shared::{LatLng, SpawnKind, SpawnLocation, WorldData};
use geoquest::{
    DataLoader, EventBus, EventReceiver, GameEvent, LoadError, SessionError, SpawnRenderer,
    WorldConfig, WorldController,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const HOME: LatLng = LatLng::new(51.5007, -0.1246);
/// Roughly 11 km north of `HOME`.
const FAR: LatLng = LatLng::new(51.6007, -0.1246);

#[derive(Default)]
struct RecordingLoader {
    reference: usize,
    player: usize,
    maps: usize,
}

impl DataLoader for RecordingLoader {
    fn fetch_reference_data(&mut self) {
        self.reference += 1;
    }

    fn fetch_player_data(&mut self) {
        self.player += 1;
    }

    fn load_map(&mut self, _center: LatLng) {
        self.maps += 1;
    }
}

#[derive(Default)]
struct RecordingRenderer {
    next: u32,
    destroyed: Vec<String>,
    visibility: Vec<(u32, bool)>,
}

impl SpawnRenderer for RecordingRenderer {
    type Handle = u32;

    fn instantiate(&mut self, _entity: &SpawnEntity, _position: LatLng, _visible: bool) -> u32 {
        self.next += 1;
        self.next
    }

    fn destroy(&mut self, id: &str, _handle: u32) {
        self.destroyed.push(id.to_owned());
    }

    fn set_visible(&mut self, handle: &mut u32, visible: bool) {
        self.visibility.push((*handle, visible));
    }
}

fn session(config: WorldConfig) -> (WorldController<u32>, EventReceiver) {
    let bus = EventBus::new(config.event_capacity);
    let receiver = bus.receiver();
    let controller = WorldController::new(config, bus.sender()).unwrap();
    (controller, receiver)
}

fn reference() -> ReferenceData {
    ReferenceData::new(vec![
        ReferenceItem::new(CHEST, Some(600)),
        ReferenceItem::new(GOLD_KEY, None),
    ])
}

fn world() -> WorldData {
    let mut chest = SpawnLocation::new("chest_near", SpawnKind::Chest, Some(HOME));
    chest.respawns = true;
    WorldData::from_locations([
        chest,
        SpawnLocation::new("minion_far", SpawnKind::Minion, Some(FAR)),
        SpawnLocation::new("station_unsnapped", SpawnKind::EnergyStation, None),
    ])
}

fn ready_count(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::Ready { .. }))
        .count()
}

#[test]
fn test_ready_once_in_any_callback_order() {
    type Callback = fn(&mut WorldController<u32>);
    let callbacks: [Callback; 3] = [
        |c| c.on_reference_data_loaded(Ok(reference())),
        |c| c.on_player_data_loaded(Ok(PlayerData::new_player())),
        |c| c.on_map_loaded(),
    ];
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let (mut controller, receiver) = session(WorldConfig::default());
        controller.start_session(&mut RecordingLoader::default());

        for i in order {
            assert!(!controller.is_ready());
            callbacks[i](&mut controller);
        }
        // Redelivered completion
        controller.on_map_loaded();

        assert!(controller.is_ready());
        assert_eq!(ready_count(&receiver.drain()), 1, "order {order:?}");
    }
}

#[test]
fn test_load_error_holds_readiness_until_retry() {
    let (mut controller, receiver) = session(WorldConfig::default());
    let mut loader = RecordingLoader::default();
    controller.start_session(&mut loader);

    controller.on_reference_data_loaded(Ok(reference()));
    controller.on_map_loaded();
    controller.on_player_data_loaded(Err(LoadError::new("player data: 503")));

    assert!(!controller.is_ready());
    assert_eq!(
        receiver.drain(),
        vec![GameEvent::LoadingError {
            message: "player data: 503".to_owned()
        }]
    );

    controller.on_player_data_loaded(Ok(PlayerData::new_player()));
    assert!(controller.is_ready());
    assert_eq!(ready_count(&receiver.drain()), 1);
}

#[test]
fn test_world_data_spawns_and_toggles() {
    let (mut controller, receiver) = session(WorldConfig::default());
    let mut renderer = RecordingRenderer::default();
    controller.set_location_fix(HOME);

    let request = controller.request_world_data(HOME).unwrap();
    assert!(controller.request_world_data(HOME).is_none());

    let report = controller.on_world_data_loaded(world(), HOME, &mut renderer);
    assert!(!controller.is_world_data_loading());
    assert_eq!(
        report.created,
        vec![
            ("chest_near".to_owned(), true),
            ("minion_far".to_owned(), false)
        ]
    );
    assert_eq!(report.skipped_unresolved, 1);

    let events = receiver.drain();
    assert_eq!(events[0], GameEvent::WorldDataRequested { request });
    assert!(events.contains(&GameEvent::EntitySpawned {
        id: "chest_near".to_owned(),
        kind: SpawnKind::Chest,
        position: HOME,
        visible: true,
    }));
    assert_eq!(events.len(), 3);

    // Same data, same position: nothing changes
    controller.refresh_visibility(HOME, &mut renderer);
    assert!(receiver.drain().is_empty());

    controller.refresh_visibility(FAR, &mut renderer);
    let events = receiver.drain();
    assert_eq!(
        events,
        vec![
            GameEvent::VisibilityChanged {
                id: "chest_near".to_owned(),
                visible: false
            },
            GameEvent::VisibilityChanged {
                id: "minion_far".to_owned(),
                visible: true
            },
        ]
    );
    assert_eq!(controller.registry().len(), 2);
}

#[test]
fn test_locations_missing_from_new_batch_are_despawned() {
    let (mut controller, receiver) = session(WorldConfig::default());
    let mut renderer = RecordingRenderer::default();

    controller.on_world_data_loaded(world(), HOME, &mut renderer);
    receiver.drain();

    let batch = WorldData::from_locations([SpawnLocation::new(
        "minion_far",
        SpawnKind::Minion,
        Some(FAR),
    )]);
    let report = controller.on_world_data_loaded(batch, HOME, &mut renderer);

    assert_eq!(report.removed, vec!["chest_near".to_owned()]);
    assert_eq!(renderer.destroyed, vec!["chest_near".to_owned()]);
    assert_eq!(
        receiver.drain(),
        vec![GameEvent::EntityDespawned {
            id: "chest_near".to_owned()
        }]
    );
}

#[test]
fn test_wait_for_world_data_gates_ready() {
    let (mut controller, receiver) = session(WorldConfig {
        wait_for_world_data: true,
        ..WorldConfig::default()
    });
    let mut renderer = RecordingRenderer::default();
    controller.start_session(&mut RecordingLoader::default());

    controller.on_reference_data_loaded(Ok(reference()));
    controller.on_player_data_loaded(Ok(PlayerData::new_player()));
    controller.on_map_loaded();
    assert!(!controller.is_ready());

    controller.on_world_data_loaded(world(), HOME, &mut renderer);
    assert!(controller.is_ready());
    assert_eq!(ready_count(&receiver.drain()), 1);
}

#[test]
fn test_gate_signals_delivered_through_full_bus() {
    let (mut controller, receiver) = session(WorldConfig {
        event_capacity: 4,
        wait_for_world_data: true,
        ..WorldConfig::default()
    });
    let mut renderer = RecordingRenderer::default();
    controller.start_session(&mut RecordingLoader::default());
    controller.on_reference_data_loaded(Ok(reference()));
    controller.on_player_data_loaded(Ok(PlayerData::new_player()));
    controller.on_map_loaded();

    let batch = WorldData::from_locations((0..10).map(|i| {
        SpawnLocation::new(format!("minion_{i:02}"), SpawnKind::Minion, Some(HOME))
    }));
    let report = controller.on_world_data_loaded(batch, HOME, &mut renderer);
    assert_eq!(report.created.len(), 10);
    assert!(controller.is_ready());

    // The spawn events overflow the bus; later load errors must still arrive
    controller.on_load_error("tile server: 502");

    let events = receiver.drain();
    assert_eq!(ready_count(&events), 1);
    assert!(events.contains(&GameEvent::LoadingError {
        message: "tile server: 502".to_owned()
    }));
    let spawned = events
        .iter()
        .filter(|e| matches!(e, GameEvent::EntitySpawned { .. }))
        .count();
    assert_eq!(spawned, 4);
}

#[test]
fn test_new_game_clears_and_rearms() {
    let (mut controller, receiver) = session(WorldConfig::default());
    let mut loader = RecordingLoader::default();
    let mut renderer = RecordingRenderer::default();

    let first = controller.start_session(&mut loader);
    controller.on_reference_data_loaded(Ok(reference()));
    controller.on_player_data_loaded(Ok(PlayerData::new_player()));
    controller.on_map_loaded();
    controller.on_world_data_loaded(world(), HOME, &mut renderer);
    receiver.drain();

    let second = controller.new_game(&mut loader, &mut renderer);
    assert_ne!(first, second);
    assert!(!controller.is_ready());
    assert!(controller.registry().is_empty());
    assert!(controller.world().data().is_empty());
    assert!(!controller.player().is_initialized());
    assert!(controller.reference().is_initialized());

    // Reference data is kept, so only player and map are reloaded
    assert_eq!((loader.reference, loader.player, loader.maps), (1, 2, 2));

    let mut despawned: Vec<GameEvent> = receiver.drain();
    despawned.sort_by_key(|e| format!("{e:?}"));
    assert_eq!(
        despawned,
        vec![
            GameEvent::EntityDespawned {
                id: "chest_near".to_owned()
            },
            GameEvent::EntityDespawned {
                id: "minion_far".to_owned()
            },
        ]
    );

    controller.on_player_data_loaded(Ok(PlayerData::new_player()));
    controller.on_map_loaded();
    assert!(controller.is_ready());
    assert_eq!(ready_count(&receiver.drain()), 1);
}

#[test]
fn test_chest_interaction_through_controller() {
    let (mut controller, _receiver) = session(WorldConfig::default());
    let mut renderer = RecordingRenderer::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    controller.on_reference_data_loaded(Ok(reference()));
    controller.on_world_data_loaded(world(), HOME, &mut renderer);

    assert!(matches!(
        controller.open_chest("chest_near", &mut rng, 1_000),
        Err(SessionError::PlayerDataNotLoaded)
    ));

    controller.on_player_data_loaded(Ok(PlayerData::new_player()));
    let before = controller.player().data().unwrap().inventory.len();

    let rewards = controller.open_chest("chest_near", &mut rng, 1_000).unwrap();
    assert_eq!(rewards.id.as_deref(), Some("chest_near"));
    assert!(!rewards.items.is_empty());
    assert!(controller.player().has_changed());
    assert!(controller.player().data().unwrap().inventory.len() >= before);

    assert!(matches!(
        controller.open_chest("chest_near", &mut rng, 1_100),
        Err(SessionError::Economy(EconomyError::StillRespawning {
            respawn_time: 1_600,
            ..
        }))
    ));
    assert!(matches!(
        controller.open_chest("minion_far", &mut rng, 1_100),
        Err(SessionError::Economy(EconomyError::WrongKind { .. }))
    ));
    assert!(matches!(
        controller.open_chest("nowhere", &mut rng, 1_100),
        Err(SessionError::UnknownLocation(_))
    ));
}
