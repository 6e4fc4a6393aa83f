//! # GEOQUEST
//!
//! The session controller, wiring the core, the game rules and the host
//! together.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         HOST APPLICATION                         │
//! │        map SDK  ·  location provider  ·  renderer  ·  UI         │
//! └───────┬──────────────────────▲───────────────────────────┬───────┘
//!         │ on_* callbacks       │ host traits               │ events
//!         ▼                      │                           │
//! ┌──────────────────────────────┴───────────┐               │
//! │             WorldController              │───────────────┘
//! │                                          │
//! │  StartupGate ── SpawnRegistry ── Services│
//! └───────┬──────────────────────────┬───────┘
//!         │                          │
//! ┌───────▼────────┐        ┌────────▼───────┐
//! │ geoquest_core  │        │geoquest_economy│
//! │ gate, registry │        │ inventory, loot│
//! │ squasher       │        │ respawns, rules│
//! └────────────────┘        └────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `world_controller`: Session orchestration
//! - `host`: Traits the host implements
//! - `events`: Outward event bus
//! - `services`: Loaded session data
//! - `config`: Session settings

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod services;
pub mod world_controller;

// Re-export the layers
pub use geoquest_core as core;
pub use geoquest_economy as economy;
pub use geoquest_shared as shared;

pub use config::WorldConfig;
pub use error::{ConfigError, SessionError, SessionResult};
pub use events::{EventBus, EventReceiver, EventSender, GameEvent};
pub use host::{DataLoader, LoadError, SpawnRenderer, StructureDecorator, StructureKind};
pub use services::{PlayerService, ReferenceService, WorldService};
pub use world_controller::WorldController;
