//! Orchestration run statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters accumulated across orchestration runs, for monitoring.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Queries dispatched to the provider.
    pub queries_dispatched: AtomicU64,
    /// Queries that finished with a transport error or non-OK status.
    pub queries_failed: AtomicU64,
    /// Results kept after mapping and truncation.
    pub results_kept: AtomicU64,
    /// Completed orchestration runs.
    pub runs_completed: AtomicU64,
}

impl SearchStats {
    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> SearchStatsSnapshot {
        SearchStatsSnapshot {
            queries_dispatched: self.queries_dispatched.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            results_kept: self.results_kept.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of search statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatsSnapshot {
    pub queries_dispatched: u64,
    pub queries_failed: u64,
    pub results_kept: u64,
    pub runs_completed: u64,
}
