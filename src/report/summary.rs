//! JSON summary of a report.
//!
//! Carries the summary statistics without the raw samples, for
//! dashboards and run-to-run comparison. Schema is versioned.

use super::node::{NodeKind, ReportNode};
use crate::parser::Pid;
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level summary written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Benchmarked processes
    pub processes: Vec<ProcessEntry>,

    /// Computed statistics, in report order
    pub statistics: Vec<StatisticSummary>,

    /// Comments of metrics that could not be computed
    pub errors: Vec<String>,

    /// Number of events in the trace
    pub event_count: usize,

    /// Timestamp when the summary was generated
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub name: String,
    pub pid: Pid,
}

/// Summary of one statistic block (milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticSummary {
    pub name: String,
    pub mean: f64,
    pub deviation: f64,
    pub count: usize,
    pub comment: String,
}

impl ReportSummary {
    /// Summarize a report tree
    pub fn from_report(root: &ReportNode) -> Self {
        use chrono::Utc;

        let mut processes = Vec::new();
        let mut event_count = 0;

        for child in root.children() {
            match child.kind() {
                NodeKind::Processes => {
                    processes.extend(child.children().iter().filter_map(|p| match p.kind() {
                        NodeKind::Process { name, pid } => Some(ProcessEntry {
                            name: name.clone(),
                            pid: *pid,
                        }),
                        _ => None,
                    }));
                }
                NodeKind::Events => event_count += child.children().len(),
                _ => {}
            }
        }

        let statistics = root
            .statistics()
            .into_iter()
            .map(|block| StatisticSummary {
                name: block.name.clone(),
                mean: block.mean,
                deviation: block.deviation,
                count: block.count(),
                comment: block.comment.clone(),
            })
            .collect();

        Self {
            version: SCHEMA_VERSION.to_string(),
            processes,
            statistics,
            errors: root.errors().into_iter().map(str::to_string).collect(),
            event_count,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Look up a statistic by name
    pub fn statistic(&self, name: &str) -> Option<&StatisticSummary> {
        self.statistics.iter().find(|s| s.name == name)
    }

    /// Render a table of the statistics for the terminal
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();

        lines.push("  TOUCH EVENT LATENCY (ms)".to_string());
        lines.push("  ┏━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━━━┳━━━━━━━━━━━━┳━━━━━━━━━┓".to_string());
        lines.push(format!(
            "  ┃ {:<20} ┃ {:^10} ┃ {:^10} ┃ {:^7} ┃",
            "Statistic", "MEAN", "STD DEV", "N"
        ));
        lines.push("  ┣━━━━━━━━━━━━━━━━━━━━━━╋━━━━━━━━━━━━╋━━━━━━━━━━━━╋━━━━━━━━━┫".to_string());

        for stat in &self.statistics {
            lines.push(format!(
                "  ┃ {:<20} ┃ {:>10.4} ┃ {:>10.4} ┃ {:>7} ┃",
                stat.name, stat.mean, stat.deviation, stat.count
            ));
        }

        lines.push("  ┗━━━━━━━━━━━━━━━━━━━━━━┻━━━━━━━━━━━━┻━━━━━━━━━━━━┻━━━━━━━━━┛".to_string());

        if !self.errors.is_empty() {
            lines.push(String::new());
            lines.push("  NOT COMPUTED".to_string());
            for error in &self.errors {
                lines.push(format!("  └─ {}", error));
            }
        }

        lines.push(String::new());
        lines.push(format!("  {} trace events", self.event_count));

        lines.join("\n")
    }
}
