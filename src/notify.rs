//! User-visible notification fan-out.
//!
//! Components publish typed notifications here; the UI collaborator that
//! renders them (toasts, banners) subscribes through the session facade.
//! Delivery is best-effort: publishing never blocks and never fails when
//! no subscriber is attached.

use crate::geo::Coordinate;
use crate::location::LocationOutcome;
use std::fmt;
use tokio::sync::broadcast;
use tracing::debug;

/// Default buffered capacity of the notification channel.
const CHANNEL_CAPACITY: usize = 32;

/// A user-visible notification.
#[derive(Debug, Clone)]
pub enum Notification {
    /// A location acquisition finished; exactly one is published per call.
    LocationResolved {
        coordinate: Coordinate,
        outcome: LocationOutcome,
    },
    /// The mapping engine reached its terminal failed state. The UI should
    /// offer a manual retry action.
    EngineFailed { reason: String },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::LocationResolved {
                coordinate,
                outcome: LocationOutcome::Measured,
            } => {
                write!(f, "Location found: {}", coordinate)
            }
            Notification::LocationResolved {
                coordinate,
                outcome,
            } => {
                write!(
                    f,
                    "{}. Using default anchorage at {}",
                    outcome.describe(),
                    coordinate
                )
            }
            Notification::EngineFailed { reason } => {
                write!(f, "Map engine failed to load ({}). Tap retry.", reason)
            }
        }
    }
}

/// Broadcast hub for notifications.
#[derive(Clone)]
pub struct NotificationHub {
    tx: broadcast::Sender<Notification>,
}

impl NotificationHub {
    /// Creates a new hub.
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribes to notifications published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Publishes one notification.
    pub fn publish(&self, notification: Notification) {
        debug!(notification = %notification, "Publishing notification");
        let _ = self.tx.send(notification);
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let hub = NotificationHub::new();
        let mut rx = hub.subscribe();

        hub.publish(Notification::EngineFailed {
            reason: "script error".to_string(),
        });

        let received = rx.try_recv().expect("notification should arrive");
        assert!(matches!(received, Notification::EngineFailed { .. }));
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let hub = NotificationHub::new();
        hub.publish(Notification::EngineFailed {
            reason: "nobody listening".to_string(),
        });
    }

    #[test]
    fn test_display_messages() {
        let measured = Notification::LocationResolved {
            coordinate: Coordinate::new_unchecked(13.0827, 80.2707),
            outcome: LocationOutcome::Measured,
        };
        assert!(measured.to_string().starts_with("Location found"));

        let fallback = Notification::LocationResolved {
            coordinate: Coordinate::new_unchecked(13.0827, 80.2707),
            outcome: LocationOutcome::Timeout,
        };
        let text = fallback.to_string();
        assert!(text.contains("timed out"), "got: {}", text);
        assert!(text.contains("default anchorage"));
    }
}
