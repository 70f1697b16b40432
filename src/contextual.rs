//! Public API for contextual segment scoring.
//!
//! The `ContextualScorerBuilder` provides a fluent API for binding a scorer
//! to a place, period and weight configuration. A `ContextualScorer` owns
//! its density cache; several scorers may share one `ContextStore`.

use crate::cache::*;
use crate::constants::*;
use crate::context::*;
use crate::error::*;
use crate::location::*;
use crate::scoring::*;
use crate::source::*;
use crate::weights::*;
use fnv::FnvHashSet;
use log::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One signal's contribution to the overall score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalScore {
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

/// Per-signal scores behind an overall score: `traffic` first, then each
/// relevant category in key order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub entries: Vec<SignalScore>,
}

impl Breakdown {
    fn push(&mut self, name: impl Into<String>, score: f64, weight: f64) {
        self.entries.push(SignalScore {
            name: name.into(),
            score,
            weight,
        });
    }

    /// Score recorded for `name`. The last entry wins when two categories
    /// share a base name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.name == name)
            .map(|entry| entry.score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.score))
    }
}

/// Builder for configuring a `ContextualScorer`.
pub struct ContextualScorerBuilder {
    place: String,
    period: String,
    weights: WeightConfig,
    grid_resolution: usize,
}

impl ContextualScorerBuilder {
    pub fn new() -> Self {
        ContextualScorerBuilder {
            place: DEFAULT_PLACE.to_string(),
            period: DEFAULT_PERIOD.to_string(),
            weights: WeightConfig::default(),
            grid_resolution: GRID_RESOLUTION,
        }
    }

    /// Place identifier (default: `chicago`).
    pub fn place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    /// Day or period whose store is loaded (default: `sunday`).
    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    /// Weights used when a query does not supply its own.
    pub fn weights(mut self, weights: WeightConfig) -> Self {
        self.weights = weights;
        self
    }

    /// Samples per axis of each kernel's normalization grid (default: 100).
    pub fn grid_resolution(mut self, resolution: usize) -> Self {
        self.grid_resolution = resolution;
        self
    }

    /// Load the configured place and period from `source`.
    pub fn build_from_source(self, source: &dyn ContextSource) -> Result<ContextualScorer> {
        let store = source.load(&self.place, &self.period)?;
        Ok(self.build(Arc::new(store)))
    }

    /// Bind to an already loaded store. The store's own place and period
    /// take precedence over the builder's.
    pub fn build(self, store: Arc<ContextStore>) -> ContextualScorer {
        ContextualScorer {
            store,
            weights: self.weights,
            cache: DensityCache::new(self.grid_resolution),
            warned_weights: FnvHashSet::default(),
        }
    }
}

impl Default for ContextualScorerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scores route segments against one place and period.
pub struct ContextualScorer {
    store: Arc<ContextStore>,
    weights: WeightConfig,
    cache: DensityCache,
    /// Signals already reported as falling back to the default weight.
    warned_weights: FnvHashSet<String>,
}

impl ContextualScorer {
    pub fn builder() -> ContextualScorerBuilder {
        ContextualScorerBuilder::new()
    }

    pub fn new(store: Arc<ContextStore>) -> Self {
        ContextualScorerBuilder::new().build(store)
    }

    pub fn store(&self) -> &Arc<ContextStore> {
        &self.store
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cached_kernels(&self) -> usize {
        self.cache.len()
    }

    /// Score of one category of the store, by key.
    pub fn score_category(
        &mut self,
        category_key: &str,
        start: GeoPoint,
        end: GeoPoint,
        query_time: f64,
    ) -> f64 {
        match self.store.category(category_key) {
            Some(category) => score_category(&mut self.cache, category, start, end, query_time),
            None => 0.0,
        }
    }

    /// Overall score using the scorer's configured weights.
    pub fn trade_off(
        &mut self,
        traffic: f64,
        start: GeoPoint,
        end: GeoPoint,
        query_time: f64,
    ) -> Result<(f64, Breakdown)> {
        let weights = self.weights.clone();
        self.trade_off_with(traffic, start, end, query_time, &weights)
    }

    /// Overall score of the segment `start -> end` at `query_time`.
    ///
    /// The traffic term is floored at 0 before the weighted category
    /// scores are added, and a non-positive total is raised to
    /// `SCORE_FLOOR`.
    pub fn trade_off_with(
        &mut self,
        traffic: f64,
        start: GeoPoint,
        end: GeoPoint,
        query_time: f64,
        weights: &WeightConfig,
    ) -> Result<(f64, Breakdown)> {
        let store = Arc::clone(&self.store);

        let mut breakdown = Breakdown::default();
        let traffic_weight = self.resolve_weight(weights, TRAFFIC_SIGNAL)?;
        breakdown.push(TRAFFIC_SIGNAL, traffic, traffic_weight);

        for category in store.relevant_categories() {
            let weight = self.resolve_weight(weights, category.base_name())?;
            let score = score_category(&mut self.cache, category, start, end, query_time);
            breakdown.push(category.base_name(), score, weight);
        }

        let mut overall_score = (traffic * traffic_weight).max(0.0);
        for entry in breakdown.entries.iter().skip(1) {
            overall_score += entry.score * entry.weight;
        }

        // NaN fails the comparison, so check it explicitly.
        if overall_score <= 0.0 || overall_score.is_nan() {
            overall_score = SCORE_FLOOR;
        }

        Ok((overall_score, breakdown))
    }

    fn resolve_weight(&mut self, weights: &WeightConfig, signal: &str) -> Result<f64> {
        let falls_back = weights.get(signal).is_none() && !weights.strict;
        if falls_back && self.warned_weights.insert(signal.to_string()) {
            warn!(
                "No weight for signal '{}', using default {}",
                signal, weights.default_weight
            );
        }

        weights.weight(signal)
    }
}
