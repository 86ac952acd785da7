//! Geofence crossing monitor
//!
//! Watches a live stream of location updates against the session's
//! boundary polygon and emits one [`CrossingEvent`] per true containment
//! change. With no polygon loaded the monitor evaluates nothing and emits
//! nothing. Marker drawing and map styling belong to the UI collaborator;
//! this module only detects.

mod detector;
mod types;

pub use detector::CrossingDetector;
pub use types::{CrossingDirection, CrossingEvent};

use crate::boundary::BoundaryPolygon;
use crate::geo::Coordinate;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Evaluates location updates against the boundary polygon.
///
/// Cheap to clone; clones share the event channel and the append-only
/// log, so the session facade can keep its accessors while the run loop
/// consumes a clone.
#[derive(Clone)]
pub struct BoundaryMonitor {
    polygon: Option<Arc<BoundaryPolygon>>,
    events_tx: broadcast::Sender<CrossingEvent>,
    log: Arc<RwLock<Vec<CrossingEvent>>>,
}

impl BoundaryMonitor {
    /// Creates a monitor over the session's cached polygon (or its
    /// absence), emitting into the given event channel.
    pub fn new(
        polygon: Option<Arc<BoundaryPolygon>>,
        events_tx: broadcast::Sender<CrossingEvent>,
        log: Arc<RwLock<Vec<CrossingEvent>>>,
    ) -> Self {
        Self {
            polygon,
            events_tx,
            log,
        }
    }

    /// Subscribes to crossing events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CrossingEvent> {
        self.events_tx.subscribe()
    }

    /// Snapshot of every crossing observed so far this session.
    pub async fn log_snapshot(&self) -> Vec<CrossingEvent> {
        self.log.read().await.clone()
    }

    /// Consumes location updates until the stream closes or the token
    /// fires.
    ///
    /// Each update is one containment evaluation; only a true state
    /// change emits an event, and the first evaluation never does.
    pub async fn run(self, mut updates: broadcast::Receiver<Coordinate>, cancel: CancellationToken) {
        let Some(polygon) = self.polygon.clone() else {
            info!("No boundary loaded; crossing detection disabled for this session");
            return;
        };

        info!(boundary = %polygon.name, "Crossing monitor started");
        let mut detector = CrossingDetector::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Crossing monitor cancelled");
                    break;
                }
                update = updates.recv() => {
                    match update {
                        Ok(position) => {
                            let inside = polygon.contains(position);
                            if let Some(direction) = detector.observe(inside) {
                                self.emit(&polygon.name, direction).await;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Crossing monitor lagged behind location updates");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            debug!("Location stream closed; crossing monitor stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn emit(&self, boundary_name: &str, direction: CrossingDirection) {
        let event = CrossingEvent {
            boundary_name: boundary_name.to_string(),
            direction,
            at: Utc::now(),
        };
        info!(boundary = boundary_name, %direction, "Boundary crossing detected");

        self.log.write().await.push(event.clone());
        let _ = self.events_tx.send(event);
    }
}
