//! Mapping engine loader
//!
//! Brings up the external mapping/search engine client with bounded retry
//! and idempotent already-loading/already-loaded detection, then exposes
//! its capability surface (`places`, `geometry`) through an
//! [`EngineHandle`].
//!
//! The load lifecycle is an explicit state machine
//! (`NotStarted → Loading → {Ready, Failed}`) published over a watch
//! channel with a single writer, so concurrent callers observe and await
//! the same in-flight load instead of racing to start another.

mod handle;
mod loader;
mod state;
mod web;

pub use handle::{Capability, EngineHandle, EngineSurface};
pub use loader::{EngineConfig, EngineError, EngineLoader, EngineTransport, LoadRequest};
pub use state::{EngineLoadState, LoadFailure};
pub use web::{WebEngineConfig, WebEngineTransport};
