//! Report tree: assembly, markup serialization and verification.
//!
//! This module handles:
//! - The typed report node tree and its markup form
//! - Building the fixed-shape latency report
//! - Re-reading a serialized report to cross-check its statistics
//! - A JSON summary of the report

pub mod builder;
pub mod node;
pub mod summary;
pub mod verify;

// Re-export main types
pub use builder::{build_report, metric_node, MetricSpec, METRICS};
pub use node::{EventRecord, NodeKind, ReportNode};
pub use summary::{ReportSummary, StatisticSummary};
pub use verify::{parse_data_elements, verify_report, ParsedData, VerifySummary};
