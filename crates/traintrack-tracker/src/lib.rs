//! Tracking sinks and run glue for training loops.
//!
//! This crate provides:
//! - Tracking callbacks: `tracing` logging, progress bar, JSONL metrics file
//! - A step-performance tracker producing namespaced metric maps
//! - A shell-command runner with captured output and typed failures
//!
//! A training loop pushes one raw [`MetricMap`] per step into the callbacks;
//! sinks that want stable numbers smooth them through an
//! [`Ema`](traintrack_core::Ema) internally.
//!
//! [`MetricMap`]: traintrack_core::MetricMap

#![warn(missing_docs)]

pub mod callbacks;
pub mod command;
pub mod performance;

pub use callbacks::*;
pub use command::*;
pub use performance::*;
