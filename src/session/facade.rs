//! Session facade implementation.

use super::readiness::{ReadinessGate, SessionReadiness};
use crate::boundary::BoundarySource;
use crate::config::SessionConfig;
use crate::engine::{EngineHandle, EngineLoader, EngineTransport};
use crate::geo::Coordinate;
use crate::location::{LocationFix, LocationProvider, PositionSource};
use crate::monitor::{BoundaryMonitor, CrossingEvent};
use crate::notify::{Notification, NotificationHub};
use crate::search::{PointOfInterest, SearchError, SearchOrchestrator};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Buffered capacity of the live location stream.
const LOCATION_CHANNEL_CAPACITY: usize = 64;

/// Buffered capacity of the crossing event channel.
const CROSSING_CHANNEL_CAPACITY: usize = 32;

/// High-level facade over the whole discovery pipeline.
///
/// Wires the three initialization tasks (position fix, boundary fetch,
/// engine load) through the readiness gate, then runs the category
/// search and spawns the crossing monitor. All state lives in memory and
/// dies with the session.
///
/// # Example
///
/// ```ignore
/// let session = SeamarkSession::new(config, position, transport, boundary);
/// session.start().await;
///
/// for poi in session.ranked_pois().await {
///     println!("{} ({:.1} km)", poi.name, poi.distance_km);
/// }
/// ```
pub struct SeamarkSession {
    config: SessionConfig,
    position: Arc<dyn PositionSource>,
    transport: Arc<dyn EngineTransport>,
    boundary: Arc<dyn BoundarySource>,
    gate: ReadinessGate,
    notifications: NotificationHub,
    /// Live location stream; the monitor subscribes, callers feed it.
    location_tx: broadcast::Sender<Coordinate>,
    /// Crossing events fan out here across monitor restarts.
    crossing_tx: broadcast::Sender<CrossingEvent>,
    crossing_log: Arc<RwLock<Vec<CrossingEvent>>>,
    /// Ranked sequence, replaced wholesale by each search run.
    pois: Arc<RwLock<Vec<PointOfInterest>>>,
    engine: RwLock<Option<EngineHandle>>,
    last_fix: RwLock<Option<LocationFix>>,
    monitor_cancel: Mutex<Option<CancellationToken>>,
}

impl SeamarkSession {
    /// Creates a session over the three platform ports.
    pub fn new(
        config: SessionConfig,
        position: Arc<dyn PositionSource>,
        transport: Arc<dyn EngineTransport>,
        boundary: Arc<dyn BoundarySource>,
    ) -> Self {
        let (location_tx, _) = broadcast::channel(LOCATION_CHANNEL_CAPACITY);
        let (crossing_tx, _) = broadcast::channel(CROSSING_CHANNEL_CAPACITY);
        Self {
            config,
            position,
            transport,
            boundary,
            gate: ReadinessGate::new(),
            notifications: NotificationHub::new(),
            location_tx,
            crossing_tx,
            crossing_log: Arc::new(RwLock::new(Vec::new())),
            pois: Arc::new(RwLock::new(Vec::new())),
            engine: RwLock::new(None),
            last_fix: RwLock::new(None),
            monitor_cancel: Mutex::new(None),
        }
    }

    /// Runs the full initialization pipeline.
    ///
    /// The three initialization tasks run concurrently; each settles its
    /// readiness slot on any terminal outcome. Once the gate is open the
    /// crossing monitor starts and one search batch runs.
    pub async fn start(&self) {
        self.initialize().await;
    }

    /// Re-runs engine load, location acquisition, and boundary fetch from
    /// scratch, superseding everything the previous cycle produced.
    pub async fn retry(&self) {
        info!("Manual retry requested; re-running initialization");
        self.boundary.invalidate().await;
        self.gate.reset();
        self.initialize().await;
    }

    async fn initialize(&self) {
        info!(version = crate::VERSION, "Session initialization started");

        let location_provider = LocationProvider::new(
            Arc::clone(&self.position),
            self.config.location.clone(),
            self.notifications.clone(),
        );
        let loader = EngineLoader::new(Arc::clone(&self.transport), self.config.engine.clone());

        // Three independent async operations; each settles its slot no
        // matter how it resolved, so the gate cannot hang on a failure.
        let (fix, boundary, engine) = tokio::join!(
            async {
                let fix = location_provider.acquire().await;
                self.gate.settle_location();
                fix
            },
            async {
                let boundary = self.boundary.load().await;
                self.gate.settle_boundary();
                boundary
            },
            async {
                let result = loader.ensure_loaded().await;
                self.gate.settle_engine();
                result
            },
        );

        let handle = match engine {
            Ok(handle) => Some(handle),
            Err(failure) => {
                self.notifications.publish(Notification::EngineFailed {
                    reason: failure.to_string(),
                });
                None
            }
        };
        *self.engine.write().await = handle.clone();
        *self.last_fix.write().await = Some(fix);

        // Supersede any monitor from a previous cycle before starting the
        // new one.
        {
            let mut cancel_slot = self.monitor_cancel.lock().await;
            if let Some(previous) = cancel_slot.take() {
                previous.cancel();
            }
            let cancel = CancellationToken::new();
            let monitor = BoundaryMonitor::new(
                boundary,
                self.crossing_tx.clone(),
                Arc::clone(&self.crossing_log),
            );
            tokio::spawn(monitor.run(self.location_tx.subscribe(), cancel.clone()));
            *cancel_slot = Some(cancel);
        }

        // The fix that initialization produced is the first entry of the
        // live location stream.
        let _ = self.location_tx.send(fix.coordinate);

        self.run_search(fix.coordinate).await;
    }

    /// Re-runs the category search against the most recent fix.
    ///
    /// Each run replaces the ranked sequence wholesale; callers holding
    /// an older snapshot keep it, new readers see the new one.
    pub async fn refresh_pois(&self) {
        let fix = *self.last_fix.read().await;
        match fix {
            Some(fix) => self.run_search(fix.coordinate).await,
            None => warn!("No location fix yet; run start() before refresh_pois()"),
        }
    }

    async fn run_search(&self, origin: Coordinate) {
        let places = self
            .engine
            .read()
            .await
            .as_ref()
            .and_then(|handle| handle.places());
        let orchestrator = SearchOrchestrator::new(places, self.config.search.clone());

        match orchestrator.search(origin).await {
            Ok(pois) => {
                info!(count = pois.len(), "Ranked POI sequence replaced");
                *self.pois.write().await = pois;
            }
            Err(SearchError::Unavailable) => {
                // Degrade silently: the list empties, no modal error.
                warn!("Place search unavailable; ranked POI sequence cleared");
                self.pois.write().await.clear();
            }
        }
    }

    /// Feeds one live location update to the crossing monitor.
    ///
    /// Updates sent before the readiness gate opens are not evaluated.
    pub fn push_location(&self, position: Coordinate) {
        let _ = self.location_tx.send(position);
    }

    /// The current ranked sequence of points of interest.
    pub async fn ranked_pois(&self) -> Vec<PointOfInterest> {
        self.pois.read().await.clone()
    }

    /// Current readiness snapshot.
    pub fn readiness(&self) -> SessionReadiness {
        self.gate.current()
    }

    /// Subscribes to readiness transitions.
    pub fn subscribe_readiness(&self) -> tokio::sync::watch::Receiver<SessionReadiness> {
        self.gate.subscribe()
    }

    /// Resolves once all three initialization slots have settled.
    pub async fn wait_ready(&self) {
        self.gate.wait_open().await;
    }

    /// Subscribes to crossing events.
    pub fn subscribe_crossings(&self) -> broadcast::Receiver<CrossingEvent> {
        self.crossing_tx.subscribe()
    }

    /// Snapshot of the append-only crossing log.
    pub async fn crossing_log(&self) -> Vec<CrossingEvent> {
        self.crossing_log.read().await.clone()
    }

    /// Subscribes to user-visible notifications.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// The most recent location fix, once initialization produced one.
    pub async fn last_fix(&self) -> Option<LocationFix> {
        *self.last_fix.read().await
    }
}
