//! Staggered category search orchestration.
//!
//! Dispatches one provider query per configured category, each at
//! `index * stagger` on a single timeline (deliberate spacing against
//! provider throttling, not full parallelism), then aggregates whatever
//! succeeded into one ranked sequence. A failed category costs its own
//! results and nothing else.

use super::category::CategoryQuery;
use super::stats::SearchStats;
use super::types::{PointOfInterest, SearchError};
use crate::engine::EngineHandle;
use crate::geo::{self, Coordinate};
use crate::provider::{NearbyQuery, PlaceResult, PlaceSearch, SearchResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Search orchestration configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search radius around the origin, in kilometers (default: 25).
    pub radius_km: f64,
    /// Results kept per category (default: 3). Values above 10 would
    /// collide with the next category's id block.
    pub max_per_category: usize,
    /// Delay between consecutive category dispatches (default: 200 ms).
    pub stagger: Duration,
    /// Ordered category batch; dispatch order is fixed by this list.
    pub categories: Vec<CategoryQuery>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_km: 25.0,
            max_per_category: 3,
            stagger: Duration::from_millis(200),
            categories: super::category::default_categories(),
        }
    }
}

impl SearchConfig {
    /// Sets the search radius in kilometers.
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Sets the per-category result cap.
    pub fn with_max_per_category(mut self, max_per_category: usize) -> Self {
        self.max_per_category = max_per_category;
        self
    }

    /// Sets the dispatch stagger.
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Sets the category batch.
    pub fn with_categories(mut self, categories: Vec<CategoryQuery>) -> Self {
        self.categories = categories;
        self
    }
}

/// Orchestrates the categorized nearby-search batch.
///
/// Re-runnable: each [`SearchOrchestrator::search`] call produces a
/// complete replacement sequence. There is no cancellation token; a newer
/// run simply supersedes an older one's results at the consumer.
pub struct SearchOrchestrator {
    places: Option<Arc<dyn PlaceSearch>>,
    config: SearchConfig,
    stats: Arc<SearchStats>,
}

impl SearchOrchestrator {
    /// Creates an orchestrator over an optional place-search capability.
    ///
    /// `None` models an engine without search: every run then fails with
    /// [`SearchError::Unavailable`] once, rather than once per category.
    pub fn new(places: Option<Arc<dyn PlaceSearch>>, config: SearchConfig) -> Self {
        Self {
            places,
            config,
            stats: Arc::new(SearchStats::default()),
        }
    }

    /// Creates an orchestrator from a ready engine handle.
    pub fn from_handle(handle: &EngineHandle, config: SearchConfig) -> Self {
        Self::new(handle.places(), config)
    }

    /// Access to the run statistics for monitoring.
    pub fn stats(&self) -> Arc<SearchStats> {
        Arc::clone(&self.stats)
    }

    /// Runs one search batch around `origin`.
    ///
    /// Dispatches every category on its staggered offset, waits for the
    /// completion tally to reach the batch size (failures included), then
    /// maps, ranks, and returns the aggregate.
    pub async fn search(
        &self,
        origin: Coordinate,
    ) -> Result<Vec<PointOfInterest>, SearchError> {
        let places = self.places.clone().ok_or(SearchError::Unavailable)?;
        let batch = self.config.categories.clone();
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let batch_size = batch.len();
        let (tx, mut rx) = mpsc::channel(batch_size);

        for (index, query) in batch.into_iter().enumerate() {
            let places = Arc::clone(&places);
            let tx = tx.clone();
            let offset = self.config.stagger * index as u32;
            let nearby = NearbyQuery {
                origin,
                radius_km: self.config.radius_km,
                keyword: query.keywords.clone(),
            };

            tokio::spawn(async move {
                sleep(offset).await;
                debug!(index, keyword = %nearby.keyword, "Dispatching category query");
                let outcome = places.nearby_search(&nearby).await;
                // Receiver dropping means a newer run superseded this one.
                let _ = tx.send((index, query, outcome)).await;
            });
        }
        drop(tx);

        // Per-category result slots, filled in completion order but
        // flattened in category order so ids stay reproducible.
        let mut slots: Vec<Option<(CategoryQuery, Vec<PlaceResult>)>> = Vec::new();
        slots.resize_with(batch_size, || None);
        let mut finished = 0usize;
        let mut failed = 0usize;

        while let Some((index, query, outcome)) = rx.recv().await {
            finished += 1;
            self.stats
                .queries_dispatched
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);

            match outcome {
                Ok(SearchResponse { status, results }) if status.is_ok() => {
                    slots[index] = Some((query, results));
                }
                Ok(SearchResponse { status, .. }) => {
                    debug!(index, category = %query.category, %status, "Category query returned no aggregatable results");
                    failed += 1;
                    self.stats
                        .queries_failed
                        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }
                Err(e) => {
                    warn!(index, category = %query.category, error = %e, "Category query failed");
                    failed += 1;
                    self.stats
                        .queries_failed
                        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }
            }

            if finished == batch_size {
                break;
            }
        }

        let mut pois = Vec::new();
        for (category_index, slot) in slots.into_iter().enumerate() {
            let Some((query, results)) = slot else {
                continue;
            };
            for (result_index, result) in results
                .into_iter()
                .take(self.config.max_per_category)
                .enumerate()
            {
                pois.push(map_poi(origin, category_index, result_index, &query, result));
            }
        }

        // Ascending by distance; the sort is stable, so equidistant
        // entries keep their discovery order.
        pois.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        self.stats
            .results_kept
            .fetch_add(pois.len() as u64, std::sync::atomic::Ordering::Relaxed);
        self.stats
            .runs_completed
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        info!(
            finished,
            failed,
            kept = pois.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search batch complete"
        );

        Ok(pois)
    }
}

/// Maps one provider result into a ranked point of interest.
fn map_poi(
    origin: Coordinate,
    category_index: usize,
    result_index: usize,
    query: &CategoryQuery,
    result: PlaceResult,
) -> PointOfInterest {
    PointOfInterest {
        id: (category_index * 10 + result_index) as u32,
        name: result.name,
        category: query.category,
        location: result.location,
        distance_km: geo::distance_km(origin, result.location),
        description: result
            .vicinity
            .unwrap_or_else(|| query.category.label().to_string()),
        rating: result.rating,
        provider_id: result.provider_id,
        price_level: result.price_level,
        photo_urls: result.photo_url.into_iter().collect(),
    }
}
