//! Report tree nodes and their markup serialization.
//!
//! The report is a write-once document: nodes are assembled after every
//! statistic is known, serialized once, then dropped.
//!
//! Attribute values are written verbatim, without escaping. Callers must
//! only pass numbers or strings free of `'`, `<` and `&`.

use crate::aggregator::StatisticBlock;
use crate::parser::{Pid, TraceEvent};
use std::fmt::{self, Write};

/// One observed trace event as listed in the `events` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub pid: Pid,
    pub name: String,
    pub timestamp: u64,
}

impl From<&TraceEvent> for EventRecord {
    fn from(event: &TraceEvent) -> Self {
        Self {
            pid: event.pid,
            name: event.name.clone(),
            timestamp: event.timestamp,
        }
    }
}

/// Variant payload of a report node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `results` document root
    Results,
    /// `processes` list
    Processes,
    /// `process` with its label and pid
    Process { name: String, pid: Pid },
    /// `events` list
    Events,
    /// `event` audit record
    Event(EventRecord),
    /// `data` statistic block with its values
    Data(StatisticBlock),
    /// `error` standing in for a statistic that could not be computed
    Error { comment: String },
}

impl NodeKind {
    /// Element name
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Results => "results",
            Self::Processes => "processes",
            Self::Process { .. } => "process",
            Self::Events => "events",
            Self::Event(_) => "event",
            Self::Data(_) => "data",
            Self::Error { .. } => "error",
        }
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Results | Self::Processes | Self::Events => Vec::new(),
            Self::Process { name, pid } => vec![("name", name.clone()), ("pid", pid.to_string())],
            Self::Event(record) => vec![
                ("pid", record.pid.to_string()),
                ("name", record.name.clone()),
                ("timestamp", record.timestamp.to_string()),
            ],
            Self::Data(block) => vec![
                ("name", block.name.clone()),
                ("mean", block.mean.to_string()),
                ("deviation", block.deviation.to_string()),
                ("comment", block.comment.clone()),
                ("count", block.count().to_string()),
            ],
            Self::Error { comment } => vec![("comment", comment.clone())],
        }
    }

    /// Inline content written before any children
    fn body(&self) -> Option<String> {
        match self {
            Self::Data(block) => Some(format!("<values>{}</values>", join_values(&block.samples))),
            _ => None,
        }
    }
}

/// A report node and its ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct ReportNode {
    kind: NodeKind,
    children: Vec<ReportNode>,
}

impl ReportNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn results() -> Self {
        Self::new(NodeKind::Results)
    }

    pub fn processes() -> Self {
        Self::new(NodeKind::Processes)
    }

    pub fn process(name: impl Into<String>, pid: Pid) -> Self {
        Self::new(NodeKind::Process {
            name: name.into(),
            pid,
        })
    }

    /// `events` list holding one `event` per record
    pub fn events(records: impl IntoIterator<Item = EventRecord>) -> Self {
        let mut node = Self::new(NodeKind::Events);
        node.children = records
            .into_iter()
            .map(|r| Self::new(NodeKind::Event(r)))
            .collect();
        node
    }

    pub fn data(block: StatisticBlock) -> Self {
        Self::new(NodeKind::Data(block))
    }

    pub fn error(comment: impl Into<String>) -> Self {
        Self::new(NodeKind::Error {
            comment: comment.into(),
        })
    }

    /// Append a child after the existing ones
    pub fn add_child(&mut self, child: ReportNode) {
        self.children.push(child);
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[ReportNode] {
        &self.children
    }

    /// All statistic blocks in document order
    pub fn statistics(&self) -> Vec<&StatisticBlock> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let NodeKind::Data(block) = &node.kind {
                out.push(block);
            }
        });
        out
    }

    /// All error comments in document order
    pub fn errors(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let NodeKind::Error { comment } = &node.kind {
                out.push(comment.as_str());
            }
        });
        out
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ReportNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Serialize the subtree to markup
    pub fn to_markup(&self) -> String {
        self.to_string()
    }

    fn write_markup(&self, out: &mut impl Write) -> fmt::Result {
        let tag = self.kind.tag();
        write!(out, "<{}", tag)?;
        for (key, value) in self.kind.attributes() {
            write!(out, " {}='{}'", key, value)?;
        }

        let body = self.kind.body();
        if body.is_none() && self.children.is_empty() {
            return out.write_str("/>");
        }

        out.write_char('>')?;
        if let Some(body) = body {
            out.write_str(&body)?;
        }
        for child in &self.children {
            child.write_markup(out)?;
        }
        write!(out, "</{}>", tag)
    }
}

impl fmt::Display for ReportNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_markup(f)
    }
}

/// Comma-separated sample list; `f64` display round-trips exactly
pub fn join_values(samples: &[f64]) -> String {
    samples
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
