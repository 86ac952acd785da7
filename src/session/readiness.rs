//! Session readiness gate.

use tokio::sync::watch;
use tracing::debug;

/// The three-slot readiness state of a session.
///
/// Each slot transitions `false → true` exactly once per initialization
/// cycle. A slot settles on any terminal outcome of its component -
/// "ready" means settled, not succeeded: an absent boundary and a failed
/// engine both settle their slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReadiness {
    /// The engine load reached `Ready` or `Failed`.
    pub engine_ready: bool,
    /// A location fix (measured or fallback) was produced.
    pub location_ready: bool,
    /// The boundary fetch settled (polygon or permanent absence).
    pub boundary_ready: bool,
}

impl SessionReadiness {
    /// True when all three slots are settled.
    pub fn is_open(&self) -> bool {
        self.engine_ready && self.location_ready && self.boundary_ready
    }
}

/// Synchronization point for the three independent initialization tasks.
///
/// Dependent work (search, crossing monitor) must not start until the
/// gate is open; [`ReadinessGate::wait_open`] is the event-driven way to
/// wait for that.
pub struct ReadinessGate {
    tx: watch::Sender<SessionReadiness>,
}

impl ReadinessGate {
    /// Creates a closed gate.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionReadiness::default());
        Self { tx }
    }

    /// Current readiness snapshot.
    pub fn current(&self) -> SessionReadiness {
        *self.tx.borrow()
    }

    /// Subscribes to readiness transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionReadiness> {
        self.tx.subscribe()
    }

    /// Settles the engine slot.
    pub fn settle_engine(&self) {
        self.settle("engine", |r| {
            let first = !r.engine_ready;
            r.engine_ready = true;
            first
        });
    }

    /// Settles the location slot.
    pub fn settle_location(&self) {
        self.settle("location", |r| {
            let first = !r.location_ready;
            r.location_ready = true;
            first
        });
    }

    /// Settles the boundary slot.
    pub fn settle_boundary(&self) {
        self.settle("boundary", |r| {
            let first = !r.boundary_ready;
            r.boundary_ready = true;
            first
        });
    }

    /// Reopens every slot for a fresh initialization cycle.
    pub fn reset(&self) {
        self.tx.send_replace(SessionReadiness::default());
    }

    /// Resolves once all three slots are settled.
    pub async fn wait_open(&self) {
        let mut rx = self.tx.subscribe();
        while !rx.borrow_and_update().is_open() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    /// Applies one slot transition; `apply` returns whether this was the
    /// slot's first settling, so repeat calls notify nobody.
    fn settle(&self, name: &'static str, apply: impl FnOnce(&mut SessionReadiness) -> bool) {
        self.tx.send_if_modified(apply);
        debug!(slot = name, readiness = ?self.current(), "Readiness slot settled");
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}
