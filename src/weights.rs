//! Signal weights for the overall score.

use crate::constants::*;
use crate::error::*;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// Weight per signal name (`traffic` plus each category base name).
///
/// Signals without an entry use `default_weight`, unless the config is
/// strict, in which case scoring fails with `MissingCategoryWeight`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub weights: FnvHashMap<String, f64>,
    pub default_weight: f64,
    pub strict: bool,
}

impl Default for WeightConfig {
    fn default() -> Self {
        WeightConfig {
            weights: DEFAULT_WEIGHTED_SIGNALS
                .iter()
                .map(|name| (name.to_string(), NEUTRAL_WEIGHT))
                .collect(),
            default_weight: NEUTRAL_WEIGHT,
            strict: false,
        }
    }
}

impl WeightConfig {
    /// A config with no explicit weights.
    pub fn empty() -> Self {
        WeightConfig {
            weights: FnvHashMap::default(),
            default_weight: NEUTRAL_WEIGHT,
            strict: false,
        }
    }

    /// Parse a flat `{"signal": weight}` JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let weights: FnvHashMap<String, f64> = serde_json::from_str(json)?;
        Ok(WeightConfig {
            weights,
            ..WeightConfig::empty()
        })
    }

    pub fn with_weight(mut self, signal: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(signal.into(), weight);
        self
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Explicit weight for `signal`, if any.
    pub fn get(&self, signal: &str) -> Option<f64> {
        self.weights.get(signal).copied()
    }

    /// Weight for `signal` under the missing-weight policy.
    pub fn weight(&self, signal: &str) -> Result<f64> {
        match self.get(signal) {
            Some(weight) => Ok(weight),
            None if self.strict => Err(ContextError::MissingCategoryWeight(signal.to_string())),
            None => Ok(self.default_weight),
        }
    }
}
