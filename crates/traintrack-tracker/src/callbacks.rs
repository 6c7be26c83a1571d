//! Tracking callbacks for run monitoring and logging.
//!
//! This module provides the standard sinks for per-step metrics:
//!
//! - [`LoggingCallback`] - periodic log lines via `tracing`
//! - [`ProgressCallback`] - progress bar with a smoothed loss readout
//! - [`MetricsJsonCallback`] - JSONL metrics file for offline import into
//!   experiment-tracking tools
//! - [`CompositeCallback`] - fan-out to multiple sinks
//!
//! Sinks that display running estimates smooth the raw metrics through an
//! [`Ema`] so noisy per-step values read sensibly.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use traintrack_core::{Ema, MetricMap, Result, TrackerConfig, TrackingCallback};

/// Logging callback emitting EMA-smoothed metrics through `tracing`.
pub struct LoggingCallback {
    log_every: usize,
    smoother: Ema,
}

impl LoggingCallback {
    /// Create a new logging callback that logs every `log_every` steps.
    pub fn new(log_every: usize) -> Self {
        Self {
            log_every,
            smoother: Ema::default(),
        }
    }

    /// Build from a tracker configuration.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.log_every)
    }

    /// Replace the default smoothing factor.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.smoother = Ema::new(alpha);
        self
    }

    /// Current smoothed snapshot of everything seen so far.
    pub fn smoothed(&self) -> &MetricMap {
        self.smoother.snapshot()
    }
}

impl TrackingCallback for LoggingCallback {
    fn on_step_end(&mut self, step: usize, metrics: &MetricMap) {
        let smoothed = self.smoother.update(metrics);
        if self.log_every > 0 && step % self.log_every == 0 {
            tracing::info!(step, metrics = ?smoothed, "training step");
        }
    }
}

/// Progress bar callback with a smoothed loss readout.
pub struct ProgressCallback {
    progress: indicatif::ProgressBar,
    smoother: Ema,
}

impl ProgressCallback {
    /// Create a new progress callback for a run of `total_steps` steps.
    pub fn new(total_steps: usize) -> Self {
        let progress = indicatif::ProgressBar::new(total_steps as u64);
        progress.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Self {
            progress,
            smoother: Ema::default(),
        }
    }
}

impl TrackingCallback for ProgressCallback {
    fn on_run_start(&mut self) {
        self.progress.reset();
    }

    fn on_run_end(&mut self) {
        match self.smoother.value("loss") {
            Some(loss) => self.progress.finish_with_message(format!("loss: {loss:.4}")),
            None => self.progress.finish_with_message("run complete"),
        }
    }

    fn on_step_end(&mut self, step: usize, metrics: &MetricMap) {
        self.smoother.update(metrics);
        self.progress.set_position(step as u64);
        if let Some(loss) = self.smoother.value("loss") {
            self.progress.set_message(format!("loss: {loss:.4}"));
        }
    }
}

/// JSONL metrics callback for offline experiment tracking.
///
/// Writes one JSON object per step to a file that external tools can import.
/// The output format is JSONL:
///
/// ```json
/// {"event": "run_start", "run_name": "baseline", "timestamp": "..."}
/// {"step": 0, "loss": 2.5, "timestamp": "..."}
/// {"step": 1, "loss": 2.3, "timestamp": "..."}
/// {"event": "run_end", "timestamp": "..."}
/// ```
///
/// Raw (unsmoothed) metrics are recorded; smoothing is a display concern
/// and downstream tools do their own.
pub struct MetricsJsonCallback {
    writer: BufWriter<File>,
    path: PathBuf,
    run_name: Option<String>,
    config: Option<serde_json::Value>,
    command: Option<String>,
}

impl MetricsJsonCallback {
    /// Create a new JSONL metrics callback writing to `path`.
    ///
    /// Parent directories are created if needed; an existing file is
    /// truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            run_name: None,
            config: None,
            command: None,
        })
    }

    /// Build from a tracker configuration, honoring the run name and
    /// command-line capture settings.
    pub fn from_config(path: impl AsRef<Path>, config: &TrackerConfig) -> Result<Self> {
        let mut callback = Self::new(path)?;
        callback.run_name = config.run_name.clone();
        if config.capture_command {
            callback = callback.with_command_line();
        }
        Ok(callback)
    }

    /// Set an optional run name for identification.
    #[must_use]
    pub fn with_run_name(mut self, name: impl Into<String>) -> Self {
        self.run_name = Some(name.into());
        self
    }

    /// Set a configuration payload to record in the run header.
    #[must_use]
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Record the invoking command line in the run header.
    #[must_use]
    pub fn with_command_line(mut self) -> Self {
        self.command = Some(std::env::args().collect::<Vec<_>>().join(" "));
        self
    }

    /// Get the path to the metrics file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_entry(&mut self, entry: serde_json::Value) {
        if let Ok(line) = serde_json::to_string(&entry) {
            let _ = writeln!(self.writer, "{line}");
        }
    }
}

impl TrackingCallback for MetricsJsonCallback {
    fn on_run_start(&mut self) {
        let mut entry = serde_json::json!({
            "event": "run_start",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(ref name) = self.run_name {
            entry["run_name"] = serde_json::json!(name);
        }
        if let Some(ref config) = self.config {
            entry["config"] = config.clone();
        }
        if let Some(ref command) = self.command {
            entry["command"] = serde_json::json!(command);
        }

        self.write_entry(entry);
        let _ = self.writer.flush();
    }

    fn on_run_end(&mut self) {
        self.write_entry(serde_json::json!({
            "event": "run_end",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));
        let _ = self.writer.flush();
    }

    fn on_step_end(&mut self, step: usize, metrics: &MetricMap) {
        let mut entry = serde_json::Map::new();
        entry.insert("step".into(), serde_json::json!(step));
        entry.insert(
            "timestamp".into(),
            serde_json::json!(chrono::Utc::now().to_rfc3339()),
        );

        // Sort metric keys for deterministic output
        let mut names: Vec<_> = metrics.keys().collect();
        names.sort();
        for name in names {
            entry.insert(name.clone(), serde_json::json!(metrics[name]));
        }

        self.write_entry(serde_json::Value::Object(entry));

        // Flush every 10 steps to balance I/O and data safety
        if step % 10 == 0 {
            let _ = self.writer.flush();
        }
    }
}

/// Composite callback that forwards events to multiple sinks.
///
/// Useful for combining backends (e.g., progress bar + JSONL file).
pub struct CompositeCallback {
    callbacks: Vec<Box<dyn TrackingCallback>>,
}

impl CompositeCallback {
    /// Create a new empty composite callback.
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Add a sink to the composite.
    pub fn add(&mut self, callback: Box<dyn TrackingCallback>) {
        self.callbacks.push(callback);
    }

    /// Get the number of sinks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Check if there are no sinks.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl Default for CompositeCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingCallback for CompositeCallback {
    fn on_run_start(&mut self) {
        for cb in &mut self.callbacks {
            cb.on_run_start();
        }
    }

    fn on_run_end(&mut self) {
        for cb in &mut self.callbacks {
            cb.on_run_end();
        }
    }

    fn on_step_end(&mut self, step: usize, metrics: &MetricMap) {
        for cb in &mut self.callbacks {
            cb.on_step_end(step, metrics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingCallback {
        starts: Arc<AtomicUsize>,
        steps: Arc<AtomicUsize>,
        ends: Arc<AtomicUsize>,
    }

    impl TrackingCallback for CountingCallback {
        fn on_run_start(&mut self) {
            self.starts.fetch_add(1, Ordering::Relaxed);
        }

        fn on_step_end(&mut self, _step: usize, _metrics: &MetricMap) {
            self.steps.fetch_add(1, Ordering::Relaxed);
        }

        fn on_run_end(&mut self) {
            self.ends.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn loss_map(value: f64) -> MetricMap {
        MetricMap::from([("loss".to_string(), value)])
    }

    #[test]
    fn test_composite_forwards_to_all_sinks() {
        let starts = Arc::new(AtomicUsize::new(0));
        let steps = Arc::new(AtomicUsize::new(0));
        let ends = Arc::new(AtomicUsize::new(0));

        let mut composite = CompositeCallback::new();
        for _ in 0..2 {
            composite.add(Box::new(CountingCallback {
                starts: starts.clone(),
                steps: steps.clone(),
                ends: ends.clone(),
            }));
        }
        assert_eq!(composite.len(), 2);

        composite.on_run_start();
        composite.on_step_end(0, &loss_map(1.0));
        composite.on_step_end(1, &loss_map(2.0));
        composite.on_run_end();

        assert_eq!(starts.load(Ordering::Relaxed), 2);
        assert_eq!(steps.load(Ordering::Relaxed), 4);
        assert_eq!(ends.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_logging_callback_smooths_incoming_metrics() {
        let mut callback = LoggingCallback::new(1);

        callback.on_step_end(0, &loss_map(1.0));
        callback.on_step_end(1, &loss_map(2.0));

        // 0.1 * 2.0 + 0.9 * 1.0 = 1.1 with the default alpha
        assert!((callback.smoothed()["loss"] - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_logging_callback_custom_alpha() {
        let mut callback = LoggingCallback::new(1).with_alpha(1.0);

        callback.on_step_end(0, &loss_map(1.0));
        callback.on_step_end(1, &loss_map(2.0));

        assert!((callback.smoothed()["loss"] - 2.0).abs() < 1e-12);
    }
}
