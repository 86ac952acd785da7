//! Location acquisition with timeout and deterministic fallback.

use super::source::PositionSource;
use super::types::{LocationFix, LocationOutcome};
use crate::geo::Coordinate;
use crate::notify::{Notification, NotificationHub};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Default anchor point returned when no live fix can be acquired.
/// Chennai harbor anchorage.
pub const DEFAULT_ANCHOR: Coordinate = Coordinate::new_unchecked(13.0827, 80.2707);

/// Location acquisition configuration.
#[derive(Debug, Clone)]
pub struct LocationConfig {
    /// Maximum time to wait for one high-accuracy read (default: 15 s).
    pub timeout: Duration,
    /// A cached fix no older than this satisfies the read without powering
    /// the sensor again (default: 60 s).
    pub max_fix_age: Duration,
    /// Coordinate returned on any failure outcome. Never absent.
    pub fallback: Coordinate,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(15_000),
            max_fix_age: Duration::from_millis(60_000),
            fallback: DEFAULT_ANCHOR,
        }
    }
}

impl LocationConfig {
    /// Sets the acquisition timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the fallback coordinate.
    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Acquires the user's position with a bounded wait and a deterministic
/// fallback.
///
/// Each [`LocationProvider::acquire`] call is independent: one sensor
/// read, one classified outcome, one published notification. A repeat
/// call simply overwrites whatever the previous one produced.
pub struct LocationProvider {
    source: Arc<dyn PositionSource>,
    config: LocationConfig,
    notifications: NotificationHub,
}

impl LocationProvider {
    /// Creates a new provider over a platform position source.
    pub fn new(
        source: Arc<dyn PositionSource>,
        config: LocationConfig,
        notifications: NotificationHub,
    ) -> Self {
        Self {
            source,
            config,
            notifications,
        }
    }

    /// Runs one acquisition.
    ///
    /// On success returns the measured coordinate with outcome
    /// [`LocationOutcome::Measured`]; on any failure returns the
    /// configured fallback with the failure classification. Exactly one
    /// notification is published per call, either way.
    pub async fn acquire(&self) -> LocationFix {
        let read = self.source.current_position(self.config.max_fix_age);

        let fix = match timeout(self.config.timeout, read).await {
            Ok(Ok(coordinate)) => {
                info!(position = %coordinate, "Position acquired");
                LocationFix {
                    coordinate,
                    outcome: LocationOutcome::Measured,
                }
            }
            Ok(Err(e)) => {
                let outcome = e.outcome();
                warn!(error = %e, ?outcome, "Position read failed; using fallback");
                LocationFix {
                    coordinate: self.config.fallback,
                    outcome,
                }
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "Position read timed out; using fallback"
                );
                LocationFix {
                    coordinate: self.config.fallback,
                    outcome: LocationOutcome::Timeout,
                }
            }
        };

        self.notifications.publish(Notification::LocationResolved {
            coordinate: fix.coordinate,
            outcome: fix.outcome,
        });

        fix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::source::tests::{MockPositionSource, StalledPositionSource};
    use crate::location::types::FixError;
    use tokio::sync::broadcast::error::TryRecvError;

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<Notification>) -> Vec<Notification> {
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(n) => out.push(n),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
        out
    }

    fn provider(source: Arc<dyn PositionSource>) -> (LocationProvider, NotificationHub) {
        let hub = NotificationHub::new();
        let provider = LocationProvider::new(source, LocationConfig::default(), hub.clone());
        (provider, hub)
    }

    #[tokio::test]
    async fn test_measured_position_is_returned() {
        let measured = Coordinate::new(9.93, 76.26).unwrap();
        let (provider, hub) = provider(Arc::new(MockPositionSource {
            response: Ok(measured),
        }));
        let mut rx = hub.subscribe();

        let fix = provider.acquire().await;
        assert_eq!(fix.coordinate, measured);
        assert_eq!(fix.outcome, LocationOutcome::Measured);
        assert!(fix.is_measured());
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_fallback_with_one_notification() {
        let (provider, hub) = provider(Arc::new(StalledPositionSource));
        let mut rx = hub.subscribe();

        let fix = provider.acquire().await;
        assert_eq!(fix.coordinate, DEFAULT_ANCHOR);
        assert_eq!(fix.outcome, LocationOutcome::Timeout);

        let notifications = drain(&mut rx);
        assert_eq!(notifications.len(), 1, "exactly one notification per call");
        assert!(matches!(
            notifications[0],
            Notification::LocationResolved {
                outcome: LocationOutcome::Timeout,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_denied_permission_classification() {
        let (provider, _hub) = provider(Arc::new(MockPositionSource {
            response: Err(FixError::PermissionDenied),
        }));

        let fix = provider.acquire().await;
        assert_eq!(fix.outcome, LocationOutcome::PermissionDenied);
        assert_eq!(fix.coordinate, DEFAULT_ANCHOR);
    }

    #[tokio::test]
    async fn test_unsupported_environment_classification() {
        let (provider, _hub) = provider(Arc::new(MockPositionSource {
            response: Err(FixError::Unsupported),
        }));

        let fix = provider.acquire().await;
        assert_eq!(fix.outcome, LocationOutcome::Unsupported);
    }

    #[tokio::test]
    async fn test_each_call_is_independent() {
        let (provider, hub) = provider(Arc::new(MockPositionSource {
            response: Err(FixError::PositionUnavailable),
        }));
        let mut rx = hub.subscribe();

        let first = provider.acquire().await;
        let second = provider.acquire().await;
        assert_eq!(first, second);
        assert_eq!(drain(&mut rx).len(), 2, "one notification per call");
    }
}
