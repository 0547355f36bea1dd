//! Trace event data model.
//!
//! A `TraceEvent` is one record of the captured trace. It is read once
//! and never mutated by the pipeline.

use crate::utils::config::EVENT_TIME_FIELD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Process identifier as reported by the tracer (`vpid`)
pub type Pid = u32;

/// A single timestamped, named, process-tagged trace event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Emitting process
    pub pid: Pid,

    /// Tracepoint name, `provider:event`
    pub name: String,

    /// Primary timestamp in nanoseconds
    pub timestamp: u64,

    /// Auxiliary timestamp fields (e.g. `event_time`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, u64>,
}

impl TraceEvent {
    pub fn new(pid: Pid, name: impl Into<String>, timestamp: u64) -> Self {
        Self {
            pid,
            name: name.into(),
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Attach an auxiliary field
    pub fn with_field(mut self, key: impl Into<String>, value: u64) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Look up an auxiliary field by name
    pub fn field(&self, key: &str) -> Option<u64> {
        self.fields.get(key).copied()
    }

    /// Kernel-origin timestamp embedded by the input stack
    pub fn event_time(&self) -> Option<u64> {
        self.field(EVENT_TIME_FIELD)
    }
}

/// The three benchmarked processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub host: Pid,
    pub nested: Pid,
    pub client: Pid,
}

impl Topology {
    pub fn new(host: Pid, nested: Pid, client: Pid) -> Self {
        Self {
            host,
            nested,
            client,
        }
    }
}
