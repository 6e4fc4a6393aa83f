//! # Startup Readiness Gate
//!
//! Tracks the asynchronous initialization milestones of a game session and
//! signals "ready" exactly once, when the last one completes.
//!
//! ## Delivery Model
//!
//! Upstream loaders deliver completions at least once. Completing a
//! milestone that is not pending is therefore a silent no-op, never an error.
//!
//! ## Sessions
//!
//! Every `initialize` starts a new session and re-arms the signal. Plain
//! `complete` does not know which session a completion belongs to, so a late
//! completion from a previous session can satisfy the new one. Callers that
//! keep the `SessionToken` from `initialize` can use `complete_for`, which
//! drops completions from older sessions.

use std::borrow::Cow;
use std::collections::BTreeSet;

/// Identifier of an initialization milestone.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MilestoneId(Cow<'static, str>);

impl MilestoneId {
    /// Reference data loaded and installed.
    pub const REFERENCE_DATA: Self = Self(Cow::Borrowed("REFERENCE_DATA_INITIALIZED"));
    /// Player data loaded and installed.
    pub const PLAYER_DATA: Self = Self(Cow::Borrowed("PLAYER_DATA_INITIALIZED"));
    /// Map finished its initial load.
    pub const MAP_DATA: Self = Self(Cow::Borrowed("MAP_INITIALIZED"));
    /// First batch of spawn locations loaded and reconciled.
    pub const PLAYABLE_LOCATIONS: Self = Self(Cow::Borrowed("PLAYABLE_LOCATIONS_INITIALIZED"));

    /// Creates a custom milestone.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the milestone name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one armed session of the gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    /// Returns the generation number.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Receives the gate's outward signals.
pub trait GateListener {
    /// All milestones of `session` completed.
    fn on_ready(&mut self, session: SessionToken);

    /// A loader reported a failure. Readiness is unaffected.
    fn on_error(&mut self, message: &str);
}

/// The readiness gate.
pub struct StartupGate<L> {
    /// Milestones still outstanding.
    pending: BTreeSet<MilestoneId>,
    /// Ready already fired for the current session.
    started: bool,
    /// Current session.
    session: SessionToken,
    /// Signal sink.
    listener: L,
}

impl<L: GateListener> StartupGate<L> {
    /// Creates an unarmed gate. It fires nothing until `initialize`.
    #[must_use]
    pub fn new(listener: L) -> Self {
        Self {
            pending: BTreeSet::new(),
            started: true,
            session: SessionToken::default(),
            listener,
        }
    }

    /// Replaces the pending set and re-arms the ready signal.
    ///
    /// Call `check_ready` afterwards so an empty set fires immediately.
    pub fn initialize(&mut self, milestones: impl IntoIterator<Item = MilestoneId>) -> SessionToken {
        self.pending = milestones.into_iter().collect();
        self.started = false;
        self.session = SessionToken(self.session.0.wrapping_add(1));

        tracing::info!(
            "Startup gate armed: session {} waiting on {} milestone(s)",
            self.session.0,
            self.pending.len()
        );

        self.session
    }

    /// Marks a milestone done. Returns whether it was pending.
    pub fn complete(&mut self, milestone: &MilestoneId) -> bool {
        let removed = self.pending.remove(milestone);
        if removed {
            tracing::debug!(
                "Milestone {} complete, {} remaining",
                milestone,
                self.pending.len()
            );
        } else {
            tracing::debug!("Ignoring completion of non-pending milestone {}", milestone);
        }
        removed
    }

    /// Like `complete`, but drops completions issued for an older session.
    pub fn complete_for(&mut self, session: SessionToken, milestone: &MilestoneId) -> bool {
        if session != self.session {
            tracing::debug!(
                "Dropping stale completion of {} from session {} (current {})",
                milestone,
                session.0,
                self.session.0
            );
            return false;
        }
        self.complete(milestone)
    }

    /// `complete` followed by `check_ready`. Returns whether ready fired.
    pub fn complete_and_check(&mut self, milestone: &MilestoneId) -> bool {
        self.complete(milestone);
        self.check_ready()
    }

    /// Fires the ready signal if nothing is pending and it has not fired yet
    /// for this session. Returns whether it fired.
    pub fn check_ready(&mut self) -> bool {
        if !self.pending.is_empty() || self.started {
            return false;
        }

        self.started = true;
        tracing::info!("Startup complete: session {} ready", self.session.0);
        self.listener.on_ready(self.session);
        true
    }

    /// Forwards a load failure. Pending milestones are left untouched.
    pub fn report_error(&mut self, message: &str) {
        tracing::warn!("Startup load error: {}", message);
        self.listener.on_error(message);
    }

    /// Returns true if the milestone is still outstanding.
    #[must_use]
    pub fn is_pending(&self, milestone: &MilestoneId) -> bool {
        self.pending.contains(milestone)
    }

    /// Iterates over outstanding milestones in name order.
    pub fn pending(&self) -> impl Iterator<Item = &MilestoneId> {
        self.pending.iter()
    }

    /// Number of outstanding milestones.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns true once ready has fired for the current session.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> SessionToken {
        self.session
    }

    /// Signal sink.
    #[must_use]
    pub const fn listener(&self) -> &L {
        &self.listener
    }
}
