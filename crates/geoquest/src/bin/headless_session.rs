//! # Headless Session
//!
//! Drives a complete session against an in-process fake host:
//!
//! 1. Startup loads answered out of order, one of them failing first
//! 2. World data generated around the avatar and reconciled
//! 3. A walk that moves spawn locations in and out of range
//! 4. An energy station interaction
//! 5. A new game that tears everything down and starts again
//!
//! Usage: `headless_session [config.toml]`

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use geoquest::core::SpawnEntity;
use geoquest::economy::{populate_world, PlayerData, ReferenceData, ReferenceItem};
use geoquest::shared::constants::{
    CHEST, DIAMOND_KEY, ENERGY_STATION, GENERAL, GOLD_KEY, MINION, TOWER,
};
use geoquest::shared::{
    FloatingOrigin, LatLng, PlayableLocation, SpawnKind, Vec3, WorldData, WorldDataRequest,
};
use geoquest::{
    DataLoader, EventBus, EventReceiver, GameEvent, LoadError, SpawnRenderer, WorldConfig,
    WorldController,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Locations returned per world data request.
const LOCATIONS_PER_REQUEST: usize = 40;

/// A request the controller issued to the host.
#[derive(Debug)]
enum Request {
    Reference,
    Player,
    Map(LatLng),
}

/// Queues requests so they can be answered later, in any order.
#[derive(Default)]
struct QueueLoader {
    requests: VecDeque<Request>,
}

impl DataLoader for QueueLoader {
    fn fetch_reference_data(&mut self) {
        self.requests.push_back(Request::Reference);
    }

    fn fetch_player_data(&mut self) {
        self.requests.push_back(Request::Player);
    }

    fn load_map(&mut self, center: LatLng) {
        self.requests.push_back(Request::Map(center));
    }
}

/// Stands in for the game server.
struct FakeServer {
    rng: ChaCha8Rng,
    player_failures: u32,
}

impl FakeServer {
    fn reference_data() -> ReferenceData {
        ReferenceData::new(vec![
            ReferenceItem::new(CHEST, Some(600)),
            ReferenceItem::new(ENERGY_STATION, Some(300)),
            ReferenceItem::new(MINION, Some(120)),
            ReferenceItem::new(TOWER, None),
            ReferenceItem::new(GENERAL, None),
            ReferenceItem::new(GOLD_KEY, None),
            ReferenceItem::new(DIAMOND_KEY, None),
        ])
    }

    fn player_data(&mut self) -> Result<PlayerData, LoadError> {
        if self.player_failures > 0 {
            self.player_failures -= 1;
            return Err(LoadError::new("player data: connection reset"));
        }
        Ok(PlayerData::new_player())
    }

    /// A few unsnapped locations mixed in, as the real service returns.
    fn world_data(&mut self, request: &WorldDataRequest) -> WorldData {
        let sw = request.south_west;
        let ne = request.north_east;
        let locations: Vec<PlayableLocation> = (0..LOCATIONS_PER_REQUEST)
            .map(|i| {
                let point = LatLng::new(
                    self.rng.gen_range(sw.latitude..ne.latitude),
                    self.rng.gen_range(sw.longitude..ne.longitude),
                );
                PlayableLocation {
                    name: format!("places/{:08x}", self.rng.gen::<u32>()),
                    snapped_point: (i % 10 != 0).then_some(point),
                    center_point: Some(point),
                }
            })
            .collect();

        let mut world = WorldData::default();
        populate_world(&mut world, &locations, &mut self.rng);
        world
    }
}

/// Prints what a renderer would draw.
struct ConsoleRenderer;

impl SpawnRenderer for ConsoleRenderer {
    type Handle = SpawnKind;

    fn instantiate(&mut self, entity: &SpawnEntity, position: LatLng, visible: bool) -> SpawnKind {
        println!("  + {} {} at {} visible={}", entity.kind, entity.id, position, visible);
        entity.kind
    }

    fn destroy(&mut self, id: &str, handle: SpawnKind) {
        println!("  - {handle} {id}");
    }

    fn set_visible(&mut self, _handle: &mut SpawnKind, _visible: bool) {}
}

struct Host {
    loader: QueueLoader,
    server: FakeServer,
    renderer: ConsoleRenderer,
}

impl Host {
    /// Answers queued requests newest first until none remain.
    fn serve(&mut self, controller: &mut WorldController<SpawnKind>) {
        while let Some(request) = self.loader.requests.pop_back() {
            match request {
                Request::Reference => {
                    controller.on_reference_data_loaded(Ok(FakeServer::reference_data()));
                }
                Request::Player => match self.server.player_data() {
                    Ok(player) => controller.on_player_data_loaded(Ok(player)),
                    Err(e) => {
                        controller.on_player_data_loaded(Err(e));
                        self.loader.fetch_player_data();
                    }
                },
                Request::Map(center) => {
                    if let Some(request) = controller.on_map_load_start(center) {
                        let world = self.server.world_data(&request);
                        controller.on_world_data_loaded(world, center, &mut self.renderer);
                    }
                    controller.on_map_loaded();
                }
            }
        }
    }
}

fn print_events(receiver: &EventReceiver) {
    for event in receiver.drain() {
        match event {
            GameEvent::Ready { session } => {
                println!("  * READY (session {})", session.generation());
            }
            GameEvent::LoadingError { message } => println!("  ! {message}"),
            GameEvent::VisibilityChanged { id, visible } => {
                println!("  ~ {id} visible={visible}");
            }
            GameEvent::WorldDataRequested { request } => {
                println!("  ? world data {} .. {}", request.south_west, request.north_east);
            }
            GameEvent::EntitySpawned { .. } | GameEvent::EntityDespawned { .. } => {}
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║                 GEOQUEST - HEADLESS SESSION                    ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_file(path)?,
        None => WorldConfig::default(),
    };
    let home = config.default_location;
    let step = config.max_distance / 2.0;

    let bus = EventBus::new(config.event_capacity);
    let receiver = bus.receiver();
    let mut controller = WorldController::new(config, bus.sender())?;
    let mut host = Host {
        loader: QueueLoader::default(),
        server: FakeServer {
            rng: ChaCha8Rng::seed_from_u64(7),
            player_failures: 1,
        },
        renderer: ConsoleRenderer,
    };

    println!("\n[1] Startup");
    controller.set_location_fix(home);
    controller.start_session(&mut host.loader);
    host.serve(&mut controller);
    print_events(&receiver);

    println!("\n[2] Walking north in {step:.0} m steps");
    let origin = controller.origin().unwrap_or_else(|| FloatingOrigin::new(home));
    let start = origin.to_world(home);
    for i in 1..=3 {
        let position = origin.to_lat_lng(Vec3::new(start.x, 0.0, start.z + step * f64::from(i)));
        controller.set_location_fix(position);
        let report = controller.refresh_visibility(position, &mut host.renderer);
        println!(
            "  step {i}: {} visible of {}",
            report.visible_count(),
            controller.registry().len()
        );
        print_events(&receiver);
    }

    println!("\n[3] Energy station");
    let station = controller
        .world()
        .of_kind(SpawnKind::EnergyStation)
        .next()
        .map(|location| location.id.clone());
    match station {
        Some(id) => match controller.use_energy_station(&id, unix_now()) {
            Ok(energy) => println!("  {} restored {} energy", energy.id, energy.amount_restored),
            Err(e) => println!("  {id}: {e}"),
        },
        None => println!("  no energy station nearby"),
    }

    println!("\n[4] New game");
    controller.new_game(&mut host.loader, &mut host.renderer);
    host.serve(&mut controller);
    print_events(&receiver);

    println!(
        "\nDone: session {} ready={} with {} spawn locations",
        controller.session().generation(),
        controller.is_ready(),
        controller.registry().len()
    );
    Ok(())
}
