//! Step-performance metrics for training loops.

use std::time::Duration;

use traintrack_core::MetricMap;

/// Accumulates per-step timing into namespaced performance metrics.
///
/// A training loop times each step and its data-loading wait, then calls
/// [`record_step`](Self::record_step) to get a metric map ready for the
/// tracking callbacks. Cumulative runtime is carried across steps.
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    total_runtime: Duration,
}

impl PerformanceTracker {
    /// Create a tracker with zero accumulated runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one step and return its performance metrics.
    ///
    /// * `step_runtime` - wall-clock duration of the training step
    /// * `data_latency` - time spent waiting on the input pipeline
    /// * `queue_depth` - number of batches ready in the input queue
    pub fn record_step(
        &mut self,
        step_runtime: Duration,
        data_latency: Duration,
        queue_depth: usize,
    ) -> MetricMap {
        self.total_runtime += step_runtime;

        MetricMap::from([
            (
                "performance/step_runtime".to_string(),
                step_runtime.as_secs_f64(),
            ),
            (
                "performance/step_runtime_cum".to_string(),
                self.total_runtime.as_secs_f64(),
            ),
            (
                "performance/data_latency".to_string(),
                data_latency.as_secs_f64(),
            ),
            (
                "performance/data_queue_depth".to_string(),
                queue_depth as f64,
            ),
        ])
    }

    /// Total step runtime accumulated so far.
    #[must_use]
    pub fn total_runtime(&self) -> Duration {
        self.total_runtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_step_namespaces_keys() {
        let mut tracker = PerformanceTracker::new();
        let metrics =
            tracker.record_step(Duration::from_millis(200), Duration::from_millis(50), 4);

        assert!((metrics["performance/step_runtime"] - 0.2).abs() < 1e-9);
        assert!((metrics["performance/data_latency"] - 0.05).abs() < 1e-9);
        assert!((metrics["performance/data_queue_depth"] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_runtime_accumulates() {
        let mut tracker = PerformanceTracker::new();

        tracker.record_step(Duration::from_millis(100), Duration::ZERO, 0);
        let metrics = tracker.record_step(Duration::from_millis(300), Duration::ZERO, 0);

        assert!((metrics["performance/step_runtime_cum"] - 0.4).abs() < 1e-9);
        assert_eq!(tracker.total_runtime(), Duration::from_millis(400));
    }
}
