//! Aggregation of trace events into derived metrics.
//!
//! This module transforms parsed trace events into:
//! - Per-process bins of timestamps and latency samples
//! - Interval metrics (arrival rates, event loop timings)
//! - Summary statistics

pub mod bins;
pub mod classifier;
pub mod intervals;
pub mod stats;

// Re-export main types and functions
pub use bins::ProcessBins;
pub use classifier::Classifier;
pub use intervals::{
    consecutive_intervals, nanos_delta_ms, EventLoopTimings, EventLoopTracepoints,
};
pub use stats::{mean, sample_std_dev, summarize, StatisticBlock};
