// File: crates/charter-core/src/reduction.rs
// Summary: Reduction policy: when to reduce, to what size, and whether to rasterize.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::downsample::{lttb_indices, minmax_indices, stride_indices};
use crate::error::{ChartError, Result};
use crate::series::Series;
use crate::settings::Settings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionMethod {
    #[default]
    Lttb,
    MinMax,
    Stride,
}

impl ReductionMethod {
    /// Indices kept when reducing `series` to `target` points.
    pub fn select(&self, series: &Series, target: usize) -> Vec<usize> {
        match self {
            ReductionMethod::Lttb => lttb_indices(&series.numeric_x(), series.y(), target),
            ReductionMethod::MinMax => minmax_indices(series.y(), target),
            ReductionMethod::Stride => stride_indices(series.len(), target),
        }
    }
}

/// Style-level reduction switches. Unset numbers fall back to [`Settings`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionOptions {
    pub auto_reduce: bool,
    /// Overrides `Settings::downsample_threshold`.
    pub threshold: Option<usize>,
    pub auto_rasterize: bool,
    pub force_rasterize: bool,
    pub method: ReductionMethod,
}

impl Default for ReductionOptions {
    fn default() -> Self {
        Self { auto_reduce: true, threshold: None, auto_rasterize: true, force_rasterize: false, method: ReductionMethod::Lttb }
    }
}

impl ReductionOptions {
    /// Resolve against global settings into the config `reduce` consumes.
    pub fn resolve(&self, settings: &Settings) -> ReductionConfig {
        let threshold = self.threshold.unwrap_or(settings.downsample_threshold);
        ReductionConfig {
            auto_reduce: self.auto_reduce,
            threshold: (threshold > 0).then_some(threshold),
            hard_cap: settings.max_points,
            auto_rasterize: self.auto_rasterize,
            rasterize_trigger: settings.rasterize_threshold,
            force_rasterize: self.force_rasterize,
            method: self.method,
            large_dataset_warning: settings.large_dataset_warning,
        }
    }

    /// An explicit zero threshold together with `auto_reduce` is a configuration error.
    pub fn validate(&self) -> Result<()> {
        if self.auto_reduce && self.threshold == Some(0) {
            return Err(ChartError::InvalidReduction("threshold must be positive when auto_reduce is set".into()));
        }
        Ok(())
    }
}

/// Fully resolved reduction config. Read-only for the reduction subsystem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReductionConfig {
    pub auto_reduce: bool,
    pub threshold: Option<usize>,
    pub hard_cap: usize,
    pub auto_rasterize: bool,
    pub rasterize_trigger: usize,
    pub force_rasterize: bool,
    pub method: ReductionMethod,
    /// Series longer than this are reported as aggressively reduced.
    pub large_dataset_warning: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        ReductionOptions::default().resolve(&Settings::default())
    }
}

impl ReductionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.auto_reduce && self.threshold == Some(0) {
            return Err(ChartError::InvalidReduction("threshold must be positive when auto_reduce is set".into()));
        }
        if self.hard_cap == 0 {
            return Err(ChartError::InvalidReduction("hard_cap must be positive".into()));
        }
        Ok(())
    }

    /// Target size for a series of `n` points, or `None` when no reduction applies.
    pub fn target_for(&self, n: usize) -> Option<usize> {
        if !self.auto_reduce || n <= 1 { return None; }
        let threshold = self.threshold.filter(|&t| t > 0)?;
        if n <= threshold { return None; }
        Some(if self.hard_cap > 0 { threshold.min(self.hard_cap) } else { threshold })
    }

    /// Rasterization uses the pre-reduction length and is independent of reduction.
    pub fn rasterize_for(&self, n: usize) -> bool {
        self.force_rasterize || (self.auto_rasterize && n > self.rasterize_trigger)
    }

    pub fn is_large(&self, n: usize) -> bool {
        self.large_dataset_warning > 0 && n > self.large_dataset_warning
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReductionResult {
    pub series: Series,
    /// Indices of `series` within the input.
    pub indices: Vec<usize>,
    pub rasterized: bool,
    pub original_len: usize,
    pub large_dataset: bool,
}

impl ReductionResult {
    pub fn reduced(&self) -> bool { self.series.len() != self.original_len }

    /// Pick the same positions out of a sequence aligned with the input series.
    pub fn project<T: Copy>(&self, aligned: &[T]) -> Vec<T> {
        self.indices.iter().filter_map(|&i| aligned.get(i).copied()).collect()
    }
}

/// Pure reduction of one series under `config`. Deterministic for identical inputs.
pub fn reduce(series: &Series, config: &ReductionConfig) -> ReductionResult {
    let n = series.len();
    let indices = match config.target_for(n) {
        Some(target) => config.method.select(series, target),
        None => (0..n).collect(),
    };
    let reduced = if indices.len() == n { series.clone() } else { series.select(&indices) };
    ReductionResult {
        series: reduced,
        indices,
        rasterized: config.rasterize_for(n),
        original_len: n,
        large_dataset: config.is_large(n),
    }
}

/// [`reduce`] plus the diagnostics a caller is expected to surface.
pub fn reduce_and_report(series: &Series, config: &ReductionConfig) -> ReductionResult {
    let result = reduce(series, config);
    let label = series.label.as_deref().unwrap_or("<unlabeled>");
    if result.large_dataset {
        warn!(series = label, points = result.original_len, kept = result.series.len(), "very large dataset, reducing aggressively");
    }
    if result.reduced() {
        debug!(series = label, method = ?config.method, from = result.original_len, to = result.series.len(), "reduced series");
    }
    if result.rasterized {
        debug!(series = label, points = result.original_len, "series marked for rasterized rendering");
    }
    result
}

/// Per-point markers are dropped once the rendered length reaches `marker_limit`.
pub fn markers_visible(rendered_len: usize, marker_limit: usize) -> bool {
    marker_limit == 0 || rendered_len < marker_limit
}
