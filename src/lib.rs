//! Touch Latency Trace
//!
//! End-to-end touch input latency analysis for a nested compositor
//! stack: a host compositor, a nested server running inside it, and a
//! client of the nested server.
//!
//! The pipeline reads a captured trace, bins the touch tracepoints per
//! process, derives latency, input-rate and event-loop statistics, and
//! writes them as a markup report with optional histograms.
//!
//! ## Getting Started
//!
//! ```bash
//! touch-latency analyze --trace trace.json \
//!     --host-pid 1201 --nested-pid 1202 --client-pid 1203
//! touch-latency validate --file touch_event_latency.xml
//! ```

pub mod aggregator;
pub mod commands;
pub mod histogram;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
