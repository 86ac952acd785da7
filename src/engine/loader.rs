//! Engine loader with bounded retry.
//!
//! Brings up the external mapping/search engine exactly once per loader:
//! concurrent callers share the in-flight load through a watch channel,
//! and a settled outcome (ready or failed) is final for the loader's
//! lifetime. The manual retry path builds a fresh loader instead of
//! reviving a failed one.

use super::handle::{Capability, EngineHandle, EngineSurface};
use super::state::{EngineLoadState, LoadFailure};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Errors the engine transport can report for one load attempt.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Script/network failure delivering the engine.
    #[error("engine transport error: {0}")]
    Transport(String),
}

/// One engine load request.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// API credential for the engine.
    pub api_key: String,
    /// Capabilities to request with the load.
    pub capabilities: Vec<Capability>,
}

/// Trait for the platform mechanism that actually delivers the engine
/// (script injection, SDK bootstrap, ...).
///
/// `load` resolves when the engine's load signal fires; the API surface
/// may attach slightly later, which is why [`EngineTransport::surface`]
/// is a separate probe. Once attached, a surface stays available for the
/// life of the process.
#[async_trait]
pub trait EngineTransport: Send + Sync {
    /// Starts one load attempt and resolves on the engine's load signal.
    async fn load(&self, request: &LoadRequest) -> Result<(), EngineError>;

    /// Returns the engine's API surface once it has attached.
    fn surface(&self) -> Option<EngineSurface>;
}

/// Engine loader configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// API credential. Absent or empty is a terminal failure that
    /// consumes no retry.
    pub api_key: Option<String>,
    /// Total load attempts allowed (default: 3).
    pub max_retries: u32,
    /// Wait between attempts (default: 2 s).
    pub retry_delay: Duration,
    /// Wait after the load signal before probing the surface, absorbing
    /// the signal-before-attach race (default: 100 ms).
    pub settle_delay: Duration,
    /// Capabilities requested with the load.
    pub capabilities: Vec<Capability>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_retries: 3,
            retry_delay: Duration::from_millis(2000),
            settle_delay: Duration::from_millis(100),
            capabilities: vec![Capability::Places, Capability::Geometry],
        }
    }
}

impl EngineConfig {
    /// Sets the API credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the total attempt budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the wait between attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

/// Loads the mapping engine with bounded retry and idempotent
/// already-loading/already-loaded detection.
pub struct EngineLoader {
    transport: Arc<dyn EngineTransport>,
    config: EngineConfig,
    state_tx: watch::Sender<EngineLoadState>,
    driver: Mutex<()>,
}

impl EngineLoader {
    /// Creates a loader over a platform transport.
    pub fn new(transport: Arc<dyn EngineTransport>, config: EngineConfig) -> Self {
        let (state_tx, _) = watch::channel(EngineLoadState::NotStarted);
        Self {
            transport,
            config,
            state_tx,
            driver: Mutex::new(()),
        }
    }

    /// Current load state.
    pub fn state(&self) -> EngineLoadState {
        self.state_tx.borrow().clone()
    }

    /// Subscribes to load state transitions.
    pub fn subscribe(&self) -> watch::Receiver<EngineLoadState> {
        self.state_tx.subscribe()
    }

    /// Resolves once the engine is loaded, driving the load if nobody
    /// else is.
    ///
    /// Settled outcomes are final: a loader that reached `Failed` keeps
    /// returning the same failure. Callers arriving while a load is in
    /// flight await that load's outcome rather than starting another.
    pub async fn ensure_loaded(&self) -> Result<EngineHandle, LoadFailure> {
        match self.state() {
            EngineLoadState::Ready(handle) => return Ok(handle),
            EngineLoadState::Failed(failure) => return Err(failure),
            EngineLoadState::Loading => return self.await_outcome().await,
            EngineLoadState::NotStarted => {}
        }

        let _driver = self.driver.lock().await;

        // A caller that held the driver lock before us may have settled
        // the state already.
        match self.state() {
            EngineLoadState::Ready(handle) => return Ok(handle),
            EngineLoadState::Failed(failure) => return Err(failure),
            _ => {}
        }

        self.drive().await
    }

    /// Awaits the outcome of a load driven by another caller.
    async fn await_outcome(&self) -> Result<EngineHandle, LoadFailure> {
        let mut rx = self.state_tx.subscribe();
        loop {
            match rx.borrow_and_update().clone() {
                EngineLoadState::Ready(handle) => return Ok(handle),
                EngineLoadState::Failed(failure) => return Err(failure),
                _ => {}
            }
            if rx.changed().await.is_err() {
                return Err(LoadFailure::ExhaustedRetries {
                    attempts: 0,
                    last_error: "engine loader dropped mid-load".to_string(),
                });
            }
        }
    }

    /// Runs the load attempts. Caller must hold the driver lock.
    async fn drive(&self) -> Result<EngineHandle, LoadFailure> {
        // The engine may already be up from an earlier lifetime of this
        // process; reuse it instead of loading again.
        if let Some(surface) = self.transport.surface() {
            let handle = EngineHandle::new(surface);
            info!("Engine already loaded; reusing attached surface");
            self.set_state(EngineLoadState::Ready(handle.clone()));
            return Ok(handle);
        }

        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                warn!("Engine credentials missing; load aborted");
                let failure = LoadFailure::MissingCredentials;
                self.set_state(EngineLoadState::Failed(failure.clone()));
                return Err(failure);
            }
        };

        self.set_state(EngineLoadState::Loading);
        let request = LoadRequest {
            api_key,
            capabilities: self.config.capabilities.clone(),
        };

        let mut last_error = String::new();
        for attempt in 1..=self.config.max_retries {
            if attempt > 1 {
                sleep(self.config.retry_delay).await;
            }
            debug!(attempt, max = self.config.max_retries, "Engine load attempt");

            match self.transport.load(&request).await {
                Ok(()) => {
                    // The load signal can fire before the API surface is
                    // attached; give it a moment before probing.
                    sleep(self.config.settle_delay).await;

                    if let Some(surface) = self.transport.surface() {
                        let handle = EngineHandle::new(surface);
                        info!(attempts = attempt, "Engine ready");
                        self.set_state(EngineLoadState::Ready(handle.clone()));
                        return Ok(handle);
                    }

                    last_error =
                        "load signal fired but API surface never attached".to_string();
                    warn!(attempt, "Engine surface missing after settle delay");
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(attempt, error = %e, "Engine load attempt failed");
                }
            }
        }

        let failure = LoadFailure::ExhaustedRetries {
            attempts: self.config.max_retries,
            last_error,
        };
        warn!(error = %failure, "Engine load failed permanently");
        self.set_state(EngineLoadState::Failed(failure.clone()));
        Err(failure)
    }

    fn set_state(&self, state: EngineLoadState) {
        debug!(?state, "Engine load state transition");
        self.state_tx.send_replace(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{NearbyQuery, PlaceSearch, ProviderError, SearchResponse, SearchStatus};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex as StdMutex;
    use tokio::time::Instant;

    struct StubPlaces;

    #[async_trait]
    impl PlaceSearch for StubPlaces {
        async fn nearby_search(
            &self,
            _query: &NearbyQuery,
        ) -> Result<SearchResponse, ProviderError> {
            Ok(SearchResponse {
                status: SearchStatus::ZeroResults,
                results: Vec::new(),
            })
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn stub_surface() -> EngineSurface {
        EngineSurface::new(Some(Arc::new(StubPlaces)), true)
    }

    /// Transport that replays a script of per-attempt outcomes.
    struct ScriptedTransport {
        outcomes: StdMutex<VecDeque<Result<(), EngineError>>>,
        /// Whether a successful load attaches the surface.
        attach_on_success: bool,
        surface: StdMutex<Option<EngineSurface>>,
        attempts: AtomicU32,
        load_delay: Duration,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<(), EngineError>>) -> Self {
            Self {
                outcomes: StdMutex::new(outcomes.into()),
                attach_on_success: true,
                surface: StdMutex::new(None),
                attempts: AtomicU32::new(0),
                load_delay: Duration::ZERO,
            }
        }

        fn attempts(&self) -> u32 {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EngineTransport for ScriptedTransport {
        async fn load(&self, _request: &LoadRequest) -> Result<(), EngineError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.load_delay > Duration::ZERO {
                sleep(self.load_delay).await;
            }
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(EngineError::Transport("script exhausted".into())));
            if outcome.is_ok() && self.attach_on_success {
                *self.surface.lock().unwrap() = Some(stub_surface());
            }
            outcome
        }

        fn surface(&self) -> Option<EngineSurface> {
            self.surface.lock().unwrap().clone()
        }
    }

    fn config() -> EngineConfig {
        EngineConfig::default().with_api_key("TEST_KEY")
    }

    #[tokio::test]
    async fn test_missing_credentials_is_terminal_without_attempts() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(())]));
        let loader = EngineLoader::new(transport.clone(), EngineConfig::default());

        let result = loader.ensure_loaded().await;
        assert_eq!(result.unwrap_err(), LoadFailure::MissingCredentials);
        assert_eq!(transport.attempts(), 0, "no retry budget consumed");
        assert!(matches!(loader.state(), EngineLoadState::Failed(_)));
    }

    #[tokio::test]
    async fn test_already_loaded_engine_is_reused() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        *transport.surface.lock().unwrap() = Some(stub_surface());
        let loader = EngineLoader::new(transport.clone(), config());

        let handle = loader.ensure_loaded().await.unwrap();
        assert!(handle.places().is_some());
        assert_eq!(transport.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_failures_then_success_reaches_ready() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(EngineError::Transport("net down".into())),
            Err(EngineError::Transport("net down".into())),
            Ok(()),
        ]));
        let loader = EngineLoader::new(transport.clone(), config());

        let started = Instant::now();
        let handle = loader.ensure_loaded().await.unwrap();
        let elapsed = started.elapsed();

        assert!(handle.places().is_some());
        assert_eq!(transport.attempts(), 3);
        // Two retry-delay waits of 2 s each, plus the settle delay.
        assert!(elapsed >= Duration::from_millis(4000), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(6000), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_exhausts_retries() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(EngineError::Transport("403".into())),
            Err(EngineError::Transport("403".into())),
            Err(EngineError::Transport("403".into())),
        ]));
        let loader = EngineLoader::new(transport.clone(), config());

        let result = loader.ensure_loaded().await;
        assert!(matches!(
            result,
            Err(LoadFailure::ExhaustedRetries { attempts: 3, .. })
        ));
        assert_eq!(transport.attempts(), 3);

        // The outcome is terminal: no further attempts on re-invocation.
        let again = loader.ensure_loaded().await;
        assert!(matches!(again, Err(LoadFailure::ExhaustedRetries { .. })));
        assert_eq!(transport.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unattached_surface_counts_as_failed_attempt() {
        let mut transport = ScriptedTransport::new(vec![Ok(()), Ok(()), Ok(())]);
        transport.attach_on_success = false;
        let transport = Arc::new(transport);
        let loader = EngineLoader::new(transport.clone(), config());

        let result = loader.ensure_loaded().await;
        match result {
            Err(LoadFailure::ExhaustedRetries { attempts, last_error }) => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("surface"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_load() {
        let mut transport = ScriptedTransport::new(vec![Ok(())]);
        transport.load_delay = Duration::from_millis(50);
        let transport = Arc::new(transport);
        let loader = Arc::new(EngineLoader::new(transport.clone(), config()));

        let a = tokio::spawn({
            let loader = Arc::clone(&loader);
            async move { loader.ensure_loaded().await }
        });
        let b = tokio::spawn({
            let loader = Arc::clone(&loader);
            async move { loader.ensure_loaded().await }
        });

        assert!(a.await.unwrap().is_ok());
        assert!(b.await.unwrap().is_ok());
        assert_eq!(transport.attempts(), 1, "one load shared by both callers");
    }
}
