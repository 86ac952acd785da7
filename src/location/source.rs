//! Position source trait.

use super::types::FixError;
use crate::geo::Coordinate;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for platform position sources (GPS, network location, simulator).
///
/// One call is one high-accuracy read. Implementations may satisfy the
/// read from a cached fix no older than `max_age` instead of powering the
/// sensor again; the caller enforces its own timeout around the call.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Produces the current position, or a fix no older than `max_age`.
    async fn current_position(&self, max_age: Duration) -> Result<Coordinate, FixError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock position source for testing.
    pub struct MockPositionSource {
        pub response: Result<Coordinate, FixError>,
    }

    #[async_trait]
    impl PositionSource for MockPositionSource {
        async fn current_position(&self, _max_age: Duration) -> Result<Coordinate, FixError> {
            self.response.clone()
        }
    }

    /// Position source that never resolves, for timeout tests.
    pub struct StalledPositionSource;

    #[async_trait]
    impl PositionSource for StalledPositionSource {
        async fn current_position(&self, _max_age: Duration) -> Result<Coordinate, FixError> {
            std::future::pending().await
        }
    }
}
