//! # GEOQUEST Core
//!
//! The two pieces of session logic the client owns outright. Everything
//! else (map tiles, GPS, prefabs) belongs to the host.
//!
//! ## Startup Readiness Gate
//!
//! ```text
//! initialize({REF, PLAYER, MAP}) ──> complete(REF) ──> complete(MAP) ──> complete(PLAYER)
//!        │                                                                    │
//!        └── check_ready(): pending non-empty, no signal        pending empty ┴─> READY (once)
//! ```
//!
//! ## Spawn Set Reconciler
//!
//! ```text
//! previous registry ─┐
//! incoming entities ─┼─> plan() ─> [remove] ─> [create] ─> [toggle] ─> registry'
//! avatar + radius   ─┘
//! ```
//!
//! ## Threading
//!
//! Both run on the host's callback thread. Nothing here blocks, spawns or
//! locks.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod metric;
pub mod reconcile;
pub mod squash;
pub mod startup;

pub use error::{CoreError, CoreResult};
pub use metric::{DistanceMetric, Haversine, Planar};
pub use reconcile::{
    Creation, ReconcilePlan, ReconcileReport, SpawnEntity, SpawnRegistry, SpawnRenderer,
    SpawnedEntry, Toggle,
};
pub use squash::{SquashConfig, Squasher};
pub use startup::{GateListener, MilestoneId, SessionToken, StartupGate};
