//! Trace parsing and event definitions.
//!
//! This module handles:
//! - Reading captured traces (JSON or babeltrace text)
//! - Defining the trace event model
//! - Recognising latency-relevant tracepoints

pub mod event_kind;
pub mod schema;
pub mod trace;

// Re-export main types
pub use event_kind::EventKind;
pub use schema::{Pid, Topology, TraceEvent};
pub use trace::{detect_trace_format, parse_trace, read_trace, TraceFormat};
