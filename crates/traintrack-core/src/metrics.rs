//! Metric smoothing via exponential moving averages.
//!
//! This module provides the canonical metric smoother used by all tracking
//! sinks. Training metrics (loss, accuracy, throughput) are noisy from step
//! to step; blending each new observation with the running estimate gives a
//! stable, human-readable number without keeping a sample window around.

use std::collections::HashMap;

use crate::SmoothingConfig;

/// Named scalar metrics produced by a single training step.
///
/// Keys are metric names (`"loss"`, `"performance/step_runtime"`, ...);
/// insertion order carries no meaning.
pub type MetricMap = HashMap<String, f64>;

/// Default smoothing factor.
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Exponential moving average over a dynamically-named set of metrics.
///
/// Each metric is smoothed independently: the first observation for a name
/// is taken verbatim, and every subsequent observation is blended as
/// `alpha * new + (1 - alpha) * old`. Metrics absent from an update are left
/// untouched — there is no decay toward zero for quiet metrics.
///
/// The smoother is a plain value type with no interior locking. A training
/// loop owns one instance per smoothing session; sharing across threads is
/// the caller's job.
#[derive(Debug, Clone)]
pub struct Ema {
    /// Weight given to the newest observation.
    alpha: f64,
    /// Current smoothed value per metric, keyed lazily on first sight.
    values: MetricMap,
}

impl Default for Ema {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl Ema {
    /// Create a new smoother with the given smoothing factor.
    ///
    /// `alpha` is not validated or clamped. Values outside `[0, 1]` are
    /// accepted and produce the corresponding extrapolating blend — the
    /// weights still sum to 1 by construction.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            values: MetricMap::new(),
        }
    }

    /// Fold one observation for a single metric into the running estimate
    /// and return that metric's new smoothed value.
    pub fn observe(&mut self, name: &str, value: f64) -> f64 {
        match self.values.get_mut(name) {
            Some(current) => {
                *current = self.alpha * value + (1.0 - self.alpha) * *current;
                *current
            }
            None => {
                // First observation: no prior estimate to blend with.
                self.values.insert(name.to_string(), value);
                value
            }
        }
    }

    /// Fold a batch of raw observations into the running estimates.
    ///
    /// Entries are smoothed independently; an empty map is a no-op. Returns
    /// the full post-update snapshot, including metrics this call did not
    /// touch.
    pub fn update(&mut self, metrics: &MetricMap) -> &MetricMap {
        for (name, &value) in metrics {
            self.observe(name, value);
        }
        &self.values
    }

    /// Current smoothed snapshot (empty until the first observation).
    #[must_use]
    pub fn snapshot(&self) -> &MetricMap {
        &self.values
    }

    /// Current smoothed value for one metric, if it has been observed.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Get the smoothing factor.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl From<SmoothingConfig> for Ema {
    fn from(config: SmoothingConfig) -> Self {
        Self::new(config.alpha)
    }
}
