//! Assemble the latency report from a classified trace.
//!
//! The root always has the same shape: the process list, one element per
//! metric (statistic or error), then the full event list. Missing data
//! degrades a single metric, never the report.

use super::node::ReportNode;
use crate::aggregator::{consecutive_intervals, summarize, Classifier, EventLoopTimings};
use crate::parser::Topology;
use crate::utils::config::{CLIENT_LABEL, HOST_LABEL, MIN_STATISTIC_SAMPLES, NESTED_LABEL};
use crate::utils::error::PairingError;
use log::{info, warn};

/// Name, comment and data description of one reported metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub comment: &'static str,
    /// What the samples are, used in error comments
    pub subject: &'static str,
}

pub const NESTED_LATENCY: MetricSpec = MetricSpec {
    name: "nested_latency",
    comment: "Kernel to nested server latency",
    subject: "nested server touch latency data",
};

pub const CLIENT_LATENCY: MetricSpec = MetricSpec {
    name: "client_latency",
    comment: "Kernel to client latency",
    subject: "client touch latency data",
};

pub const HOST_INPUT_RATE: MetricSpec = MetricSpec {
    name: "host_input_rate",
    comment: "Host input event rate",
    subject: "host server input event timestamp data",
};

pub const NESTED_INPUT_RATE: MetricSpec = MetricSpec {
    name: "nested_input_rate",
    comment: "Nested server event rate",
    subject: "nested server input event timestamp data",
};

pub const CLIENT_INPUT_RATE: MetricSpec = MetricSpec {
    name: "client_input_rate",
    comment: "Client event rate",
    subject: "client event timestamp data",
};

pub const EVENT_LOOP_DISPATCH: MetricSpec = MetricSpec {
    name: "qtmir_dispatch",
    comment: "Time QtEventFeeder spent dispatching event to Qt",
    subject: "event loop dispatch data",
};

pub const EVENT_LOOP_CONSUME: MetricSpec = MetricSpec {
    name: "qtmir_consume",
    comment: "Time MirSurfaceItem spent consuming event",
    subject: "event loop consume data",
};

pub const EVENT_LOOP_GAP: MetricSpec = MetricSpec {
    name: "qtmir_eventloop",
    comment: "Time spent in qtmir event loop",
    subject: "event loop gap data",
};

/// Every metric in report order
pub const METRICS: [MetricSpec; 8] = [
    NESTED_LATENCY,
    CLIENT_LATENCY,
    HOST_INPUT_RATE,
    NESTED_INPUT_RATE,
    CLIENT_INPUT_RATE,
    EVENT_LOOP_DISPATCH,
    EVENT_LOOP_CONSUME,
    EVENT_LOOP_GAP,
];

const EVENT_LOOP_ERROR_PREFIX: &str = "Cannot calculate QtMir loop data";

/// Build the complete report tree
///
/// **Public** - main entry point for report assembly
///
/// Consumes the classifier: its bins are not needed once statistics
/// exist, and its event list moves into the report.
pub fn build_report(classifier: Classifier, topology: &Topology) -> ReportNode {
    let mut root = ReportNode::results();
    root.add_child(process_list(topology));

    root.add_child(metric_node(
        &NESTED_LATENCY,
        classifier.touch_latency(topology.nested).to_vec(),
    ));
    root.add_child(metric_node(
        &CLIENT_LATENCY,
        classifier.touch_latency(topology.client).to_vec(),
    ));

    root.add_child(metric_node(
        &HOST_INPUT_RATE,
        consecutive_intervals(classifier.motion_published(topology.host)),
    ));
    root.add_child(metric_node(
        &NESTED_INPUT_RATE,
        consecutive_intervals(classifier.touch_receipts(topology.nested)),
    ));
    root.add_child(metric_node(
        &CLIENT_INPUT_RATE,
        consecutive_intervals(classifier.touch_receipts(topology.client)),
    ));

    for node in event_loop_nodes(classifier.event_loop(topology.nested).pair()) {
        root.add_child(node);
    }

    info!(
        "Report built: {} statistics, {} errors",
        root.statistics().len(),
        root.errors().len()
    );

    root.add_child(ReportNode::events(classifier.into_events()));
    root
}

/// `processes` element for the three benchmarked processes
pub fn process_list(topology: &Topology) -> ReportNode {
    let mut processes = ReportNode::processes();
    processes.add_child(ReportNode::process(HOST_LABEL, topology.host));
    processes.add_child(ReportNode::process(NESTED_LABEL, topology.nested));
    processes.add_child(ReportNode::process(CLIENT_LABEL, topology.client));
    processes
}

/// A `data` element, or an `error` element when the samples cannot
/// support a standard deviation
pub fn metric_node(spec: &MetricSpec, samples: Vec<f64>) -> ReportNode {
    if samples.len() < MIN_STATISTIC_SAMPLES {
        let comment = insufficient_data_comment(spec.subject, samples.len());
        warn!("{}: {}", spec.name, comment);
        return ReportNode::error(comment);
    }

    match summarize(spec.name, spec.comment, samples) {
        Ok(block) => ReportNode::data(block),
        Err(e) => ReportNode::error(e.to_string()),
    }
}

/// Event loop elements: three statistics, or a single error covering all
pub fn event_loop_nodes(pairing: Result<EventLoopTimings, PairingError>) -> Vec<ReportNode> {
    let timings = match pairing {
        Ok(timings) if timings.len() >= MIN_STATISTIC_SAMPLES => timings,
        Ok(timings) => {
            let comment = format!(
                "{} - {} dispatch/consume pair recorded, at least {} required",
                EVENT_LOOP_ERROR_PREFIX,
                timings.len(),
                MIN_STATISTIC_SAMPLES
            );
            warn!("{}", comment);
            return vec![ReportNode::error(comment)];
        }
        Err(PairingError::Empty) => {
            let comment = format!("{} - no dispatch events recorded", EVENT_LOOP_ERROR_PREFIX);
            warn!("{}", comment);
            return vec![ReportNode::error(comment)];
        }
        Err(e @ PairingError::LengthMismatch { .. }) => {
            warn!("Event loop pairing failed: {}", e);
            return vec![ReportNode::error(format!(
                "{} - Dispatch event count did not match surface consume event count",
                EVENT_LOOP_ERROR_PREFIX
            ))];
        }
    };

    vec![
        metric_node(&EVENT_LOOP_DISPATCH, timings.dispatch),
        metric_node(&EVENT_LOOP_CONSUME, timings.consume),
        metric_node(&EVENT_LOOP_GAP, timings.gap),
    ]
}

fn insufficient_data_comment(subject: &str, count: usize) -> String {
    if count == 0 {
        format!("No {}", subject)
    } else {
        format!(
            "Not enough {}: {} sample, at least {} required",
            subject, count, MIN_STATISTIC_SAMPLES
        )
    }
}
