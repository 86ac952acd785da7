//! Engine load state machine.

use super::handle::EngineHandle;
use thiserror::Error;

/// Lifecycle of the engine load.
///
/// ```text
/// NotStarted --[ensure_loaded]--> Loading --> Ready
/// NotStarted --[ensure_loaded]--> Loading --> Failed
/// ```
///
/// Held in a `tokio::sync::watch` channel with a single writer (the load
/// driver); concurrent callers observe and await the same in-flight state
/// instead of racing to start a second load.
#[derive(Debug, Clone)]
pub enum EngineLoadState {
    /// No load has been attempted yet.
    NotStarted,
    /// A load is in flight.
    Loading,
    /// The engine is up and its surface is attached.
    Ready(EngineHandle),
    /// The load reached a terminal failure.
    Failed(LoadFailure),
}

impl EngineLoadState {
    /// True for the two terminal states.
    pub fn is_settled(&self) -> bool {
        matches!(self, EngineLoadState::Ready(_) | EngineLoadState::Failed(_))
    }
}

/// Terminal reasons an engine load can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// No API credential was configured. Not retryable.
    #[error("mapping engine credentials are missing")]
    MissingCredentials,

    /// Every allowed attempt failed.
    #[error("mapping engine failed to load after {attempts} attempts: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },
}
