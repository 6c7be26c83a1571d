//! Core trait definitions.

use crate::MetricMap;

/// Callback trait for training-run events.
///
/// Implementations consume the raw per-step metric maps produced by a
/// training loop; whether and how to smooth them is up to each sink. All
/// hooks default to no-ops so sinks only implement what they care about.
pub trait TrackingCallback: Send + Sync {
    /// Called once before the first step of a run.
    fn on_run_start(&mut self) {}

    /// Called after each step with the raw metrics for that step.
    fn on_step_end(&mut self, _step: usize, _metrics: &MetricMap) {}

    /// Called once after the last step of a run.
    fn on_run_end(&mut self) {}
}
