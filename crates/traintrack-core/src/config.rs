//! Configuration types for traintrack.

use serde::{Deserialize, Serialize};

use crate::metrics::DEFAULT_ALPHA;

/// Metric-smoothing configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Smoothing factor: weight given to the newest observation.
    ///
    /// Not validated; values outside `[0, 1]` are passed through as-is.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

/// Run-tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Human-readable run name recorded by file-based sinks.
    #[serde(default)]
    pub run_name: Option<String>,

    /// Emit a log line every this many steps.
    #[serde(default = "default_log_every")]
    pub log_every: usize,

    /// Record the invoking command line in the run header.
    #[serde(default = "default_true")]
    pub capture_command: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            run_name: None,
            log_every: default_log_every(),
            capture_command: true,
        }
    }
}

// Default value functions
fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}
fn default_log_every() -> usize {
    10
}
fn default_true() -> bool {
    true
}
