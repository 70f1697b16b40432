//! Per-scorer memo of fitted density kernels.
//!
//! Each `(category, sub-type, window)` is fitted at most once per cache.
//! Entries are never invalidated; a failed fit leaves the cache untouched
//! so the same cloud is simply retried on the next query.

use crate::constants::*;
use crate::error::*;
use crate::grid::*;
use crate::kde::*;
use crate::location::*;
use crate::window::*;
use fnv::FnvHashMap;
use log::*;

/// Identity of one fitted kernel.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KernelKey {
    pub category: String,
    pub subtype: String,
    pub window: WindowBoundary,
}

impl KernelKey {
    pub fn new(
        category: impl Into<String>,
        subtype: impl Into<String>,
        window: WindowBoundary,
    ) -> Self {
        KernelKey {
            category: category.into(),
            subtype: subtype.into(),
            window,
        }
    }
}

/// A fitted kernel with the density range sampled over its grid.
#[derive(Clone, Debug)]
pub struct KernelEntry {
    pub kernel: GaussianKde,
    pub min: f64,
    pub max: f64,
}

impl KernelEntry {
    /// Min-max normalize `density` against the sampled range.
    pub fn normalize(&self, density: f64) -> Result<f64> {
        let range = self.max - self.min;
        if !(range.is_finite() && range > 0.0) {
            return Err(ContextError::DegenerateNormalization {
                min: self.min,
                max: self.max,
            });
        }

        Ok((density - self.min) / range)
    }
}

/// Counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Kernels fitted and stored.
    pub fits: u64,
    /// Lookups satisfied by an existing entry.
    pub hits: u64,
    /// Fits rejected as singular.
    pub singular_failures: u64,
}

pub struct DensityCache {
    resolution: usize,
    entries: FnvHashMap<KernelKey, KernelEntry>,
    stats: CacheStats,
}

impl Default for DensityCache {
    fn default() -> Self {
        Self::new(GRID_RESOLUTION)
    }
}

impl DensityCache {
    /// Create an empty cache sampling on a `resolution` x `resolution` grid.
    pub fn new(resolution: usize) -> Self {
        DensityCache {
            resolution: resolution.max(1),
            entries: FnvHashMap::default(),
            stats: CacheStats::default(),
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn get(&self, key: &KernelKey) -> Option<&KernelEntry> {
        self.entries.get(key)
    }

    /// Make sure a kernel for `key` exists, fitting `points` if needed.
    ///
    /// Returns `false` when the cloud cannot be fitted; the key then
    /// contributes no score.
    pub fn ensure_fitted(&mut self, points: &[GeoPoint], key: &KernelKey) -> bool {
        if self.entries.contains_key(key) {
            self.stats.hits += 1;
            return true;
        }

        match fit_entry(points, self.resolution) {
            Ok(entry) => {
                debug!(
                    "Fitted kernel {:?}: points={}, min={}, max={}",
                    key,
                    points.len(),
                    entry.min,
                    entry.max
                );
                self.entries.insert(key.clone(), entry);
                self.stats.fits += 1;
                true
            }
            Err(err) => {
                debug!("Kernel fit failed for {:?}: {}", key, err);
                self.stats.singular_failures += 1;
                false
            }
        }
    }

    /// Normalized density of the kernel for `key` at `point`.
    ///
    /// Missing kernels, flat sampled densities and non-finite results all
    /// score 0.
    pub fn score_at(&self, point: GeoPoint, key: &KernelKey) -> f64 {
        let entry = match self.entries.get(key) {
            Some(entry) => entry,
            None => return 0.0,
        };

        match entry.normalize(entry.kernel.pdf(point)) {
            Ok(score) if score.is_finite() => score,
            Ok(score) => {
                debug!("Non-finite score {} for {:?} at {:?}", score, key, point);
                0.0
            }
            Err(err) => {
                debug!("Scoring {:?} falls back to 0: {}", key, err);
                0.0
            }
        }
    }
}

fn fit_entry(points: &[GeoPoint], resolution: usize) -> Result<KernelEntry> {
    let singular = || ContextError::SingularDistribution {
        points: points.len(),
    };

    let bounds = BoundingBox::of(points).ok_or_else(singular)?;
    let kernel = GaussianKde::fit(points)?;

    let mut grid = DensityGrid::new(&bounds, resolution);
    grid.fill(|node| kernel.pdf(node));
    let (min, max) = grid.min_max().ok_or_else(singular)?;

    Ok(KernelEntry { kernel, min, max })
}
