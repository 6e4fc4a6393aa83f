//! # GEOQUEST Event System
//!
//! Outward notifications from the session to UI consumers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐      ┌─────────────┐      ┌─────────────┐
//! │ WorldController  │─────>│   Event     │─────>│     UI      │
//! │  (host thread)   │      │   Channel   │      │ (any thread)│
//! └──────────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! Events flow FROM the session TO the UI. The main channel is bounded; a
//! full channel drops the event rather than stalling the host's callback
//! thread.
//!
//! Gate signals (`Ready`, `LoadingError`) travel on a separate unbounded
//! lane and are never dropped. Receivers hand them out ahead of queued
//! regular events.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use geoquest_core::{GateListener, SessionToken};
use geoquest_shared::{LatLng, SpawnKind, WorldDataRequest};

/// Events emitted by the session.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    // =========================================================================
    // Startup
    // =========================================================================
    /// Every startup milestone completed. Emitted once per session.
    Ready {
        /// The session that became ready.
        session: SessionToken,
    },

    /// A loader failed. Startup stays pending until a retry succeeds.
    LoadingError {
        /// Human-readable cause.
        message: String,
    },

    // =========================================================================
    // Spawn Locations
    // =========================================================================
    /// A spawn location object was instantiated.
    EntitySpawned {
        /// Location id.
        id: String,
        /// Location kind.
        kind: SpawnKind,
        /// Snapped position.
        position: LatLng,
        /// Initial visibility.
        visible: bool,
    },

    /// A spawn location object was destroyed.
    EntityDespawned {
        /// Location id.
        id: String,
    },

    /// A live object was shown or hidden.
    VisibilityChanged {
        /// Location id.
        id: String,
        /// New visibility.
        visible: bool,
    },

    // =========================================================================
    // World Data
    // =========================================================================
    /// A world data refresh was issued.
    WorldDataRequested {
        /// Area requested.
        request: WorldDataRequest,
    },
}

/// Event bus between the session and its consumers.
///
/// Pre-allocates a bounded channel to prevent memory growth. Gate signals
/// get their own unbounded lane, which only loaders and the gate feed.
pub struct EventBus {
    /// Sender end - held by event producers.
    sender: Sender<GameEvent>,
    /// Receiver end - held by event consumers.
    receiver: Receiver<GameEvent>,
    /// Gate signal lane, sender end.
    signal_sender: Sender<GameEvent>,
    /// Gate signal lane, receiver end.
    signal_receiver: Receiver<GameEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        let (signal_sender, signal_receiver) = unbounded();
        Self {
            sender,
            receiver,
            signal_sender,
            signal_receiver,
        }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
            signals: self.signal_sender.clone(),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
            signals: self.signal_receiver.clone(),
        }
    }

    /// Creates a new pair of sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
    signals: Sender<GameEvent>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the event was dropped.
    #[inline]
    pub fn send(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!("Event channel full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Sends a gate signal. Never dropped while a receiver is alive.
    ///
    /// Returns `false` if every receiver is gone.
    pub fn send_signal(&self, event: GameEvent) -> bool {
        self.signals.send(event).is_ok()
    }
}

/// The gate signals straight onto the bus.
impl GateListener for EventSender {
    fn on_ready(&mut self, session: SessionToken) {
        self.send_signal(GameEvent::Ready { session });
    }

    fn on_error(&mut self, message: &str) {
        self.send_signal(GameEvent::LoadingError {
            message: message.to_owned(),
        });
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<GameEvent>,
    signals: Receiver<GameEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking), gate signals first.
    #[inline]
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = Vec::with_capacity(self.pending_count());
        while let Ok(event) = self.signals.try_recv() {
            events.push(event);
        }
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Receives one event (non-blocking).
    ///
    /// Returns `None` if no events pending.
    #[inline]
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.signals
            .try_recv()
            .or_else(|_| self.receiver.try_recv())
            .ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.signals.len() + self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.signals.is_empty() || !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_send_receive() {
        let bus = EventBus::new(100);
        let sender = bus.sender();
        let receiver = bus.receiver();

        assert!(sender.send(GameEvent::EntityDespawned { id: "a".into() }));
        assert!(receiver.has_events());

        let received = receiver.try_recv().unwrap();
        assert_eq!(received, GameEvent::EntityDespawned { id: "a".into() });
    }

    #[test]
    fn test_event_drain() {
        let (sender, receiver) = EventBus::create_pair(100);

        for i in 0..10 {
            let _ = sender.send(GameEvent::VisibilityChanged {
                id: format!("loc_{i}"),
                visible: i % 2 == 0,
            });
        }

        let events = receiver.drain();
        assert_eq!(events.len(), 10);
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_full_channel_drops() {
        let (sender, receiver) = EventBus::create_pair(1);

        assert!(sender.send(GameEvent::EntityDespawned { id: "a".into() }));
        assert!(!sender.send(GameEvent::EntityDespawned { id: "b".into() }));
        assert_eq!(receiver.pending_count(), 1);
    }

    #[test]
    fn test_gate_signals_survive_full_channel() {
        let (mut sender, receiver) = EventBus::create_pair(1);

        assert!(sender.send(GameEvent::EntityDespawned { id: "a".into() }));
        assert!(!sender.send(GameEvent::EntityDespawned { id: "b".into() }));
        sender.on_error("timeout");
        sender.on_ready(SessionToken::default());

        assert_eq!(receiver.pending_count(), 3);
        assert_eq!(
            receiver.drain(),
            vec![
                GameEvent::LoadingError {
                    message: "timeout".into()
                },
                GameEvent::Ready {
                    session: SessionToken::default()
                },
                GameEvent::EntityDespawned { id: "a".into() },
            ]
        );
    }

    #[test]
    fn test_gate_signals_become_events() {
        let (mut sender, receiver) = EventBus::create_pair(8);

        sender.on_error("boom");
        sender.on_ready(SessionToken::default());

        assert_eq!(
            receiver.drain(),
            vec![
                GameEvent::LoadingError {
                    message: "boom".into()
                },
                GameEvent::Ready {
                    session: SessionToken::default()
                },
            ]
        );
    }
}
