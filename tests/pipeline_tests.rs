use pretty_assertions::assert_eq;
use touch_latency_trace::aggregator::Classifier;
use touch_latency_trace::parser::{parse_trace, Topology, TraceEvent};
use touch_latency_trace::report::{build_report, parse_data_elements, verify_report, NodeKind};
use touch_latency_trace::utils::config::{
    CLIENT_TOUCH_EVENT, CONSUME_END_EVENT, CONSUME_START_EVENT, DISPATCH_END_EVENT,
    DISPATCH_START_EVENT, SERVER_MOTION_EVENT,
};

const HOST: u32 = 100;
const NESTED: u32 = 200;
const CLIENT: u32 = 300;
const MS: u64 = 1_000_000;

fn topology() -> Topology {
    Topology::new(HOST, NESTED, CLIENT)
}

fn motion(pid: u32, timestamp: u64, event_time: u64) -> TraceEvent {
    TraceEvent::new(pid, SERVER_MOTION_EVENT, timestamp).with_field("event_time", event_time)
}

fn receipt(pid: u32, timestamp: u64, event_time: u64) -> TraceEvent {
    TraceEvent::new(pid, CLIENT_TOUCH_EVENT, timestamp).with_field("event_time", event_time)
}

fn event_loop(pid: u32) -> Vec<TraceEvent> {
    vec![
        TraceEvent::new(pid, DISPATCH_START_EVENT, 10 * MS),
        TraceEvent::new(pid, DISPATCH_END_EVENT, 20 * MS),
        TraceEvent::new(pid, CONSUME_START_EVENT, 25 * MS),
        TraceEvent::new(pid, CONSUME_END_EVENT, 40 * MS),
        TraceEvent::new(pid, DISPATCH_START_EVENT, 50 * MS),
        TraceEvent::new(pid, DISPATCH_END_EVENT, 65 * MS),
        TraceEvent::new(pid, CONSUME_START_EVENT, 70 * MS),
        TraceEvent::new(pid, CONSUME_END_EVENT, 90 * MS),
    ]
}

/// Every metric has at least two samples
fn full_trace() -> Vec<TraceEvent> {
    let mut events = vec![
        motion(HOST, 1_100_000, MS),
        motion(HOST, 3_100_000, 3 * MS),
        motion(HOST, 6_100_000, 6 * MS),
        receipt(NESTED, 1_500_000, MS),
        receipt(NESTED, 4 * MS, 3 * MS),
        receipt(NESTED, 6_250_000, 6 * MS),
        receipt(CLIENT, 2 * MS, MS),
        receipt(CLIENT, 5 * MS, 3 * MS),
        receipt(CLIENT, 9 * MS, 6 * MS),
    ];
    events.extend(event_loop(NESTED));
    events
}

fn data_names(root: &touch_latency_trace::report::ReportNode) -> Vec<String> {
    root.statistics().iter().map(|b| b.name.clone()).collect()
}

#[test]
fn test_full_trace_reports_every_metric() {
    let events = full_trace();
    let root = build_report(Classifier::from_events(&events), &topology());

    assert_eq!(
        data_names(&root),
        vec![
            "nested_latency",
            "client_latency",
            "host_input_rate",
            "nested_input_rate",
            "client_input_rate",
            "qtmir_dispatch",
            "qtmir_consume",
            "qtmir_eventloop",
        ]
    );
    assert!(root.errors().is_empty());

    let stats = root.statistics();
    assert_eq!(stats[0].samples, vec![0.5, 1.0, 0.25]);
    assert_eq!(stats[1].samples, vec![1.0, 2.0, 3.0]);
    assert_eq!(stats[1].mean, 2.0);
    assert_eq!(stats[1].deviation, 1.0);
    assert_eq!(stats[2].samples, vec![2.0, 3.0]);
    assert_eq!(stats[3].samples, vec![2.5, 2.25]);
    assert_eq!(stats[4].samples, vec![3.0, 4.0]);
    assert_eq!(stats[5].samples, vec![10.0, 15.0]);
    assert_eq!(stats[6].samples, vec![15.0, 20.0]);
    assert_eq!(stats[7].samples, vec![5.0, 5.0]);
    assert_eq!(stats[7].deviation, 0.0);
}

#[test]
fn test_report_layout() {
    let events = full_trace();
    let root = build_report(Classifier::from_events(&events), &topology());

    let children = root.children();
    assert_eq!(children.first().map(|c| c.kind()), Some(&NodeKind::Processes));
    assert_eq!(children.last().map(|c| c.kind()), Some(&NodeKind::Events));
    // processes + 8 metrics + events
    assert_eq!(children.len(), 10);

    let processes: Vec<_> = children[0]
        .children()
        .iter()
        .map(|p| p.kind().clone())
        .collect();
    assert_eq!(
        processes,
        vec![
            NodeKind::Process { name: "Host".to_string(), pid: HOST },
            NodeKind::Process { name: "Nested Server".to_string(), pid: NESTED },
            NodeKind::Process { name: "Client".to_string(), pid: CLIENT },
        ]
    );

    // every event is listed, in trace order
    let listed = children[9].children();
    assert_eq!(listed.len(), events.len());
    match listed[3].kind() {
        NodeKind::Event(record) => {
            assert_eq!(record.pid, NESTED);
            assert_eq!(record.name, CLIENT_TOUCH_EVENT);
            assert_eq!(record.timestamp, 1_500_000);
        }
        other => panic!("expected event, got {:?}", other),
    }
}

#[test]
fn test_negative_latency_leaves_single_sample() {
    let client = 7;
    let events = vec![
        receipt(client, 2 * MS, MS),
        // received before it was generated
        receipt(client, 3 * MS, 4 * MS),
    ];

    let root = build_report(
        Classifier::from_events(&events),
        &Topology::new(5, 6, client),
    );

    assert!(!data_names(&root).contains(&"client_latency".to_string()));
    let errors = root.errors();
    assert!(errors
        .iter()
        .any(|e| e.starts_with("Not enough client touch latency data")));
    // the rejected receipt does not count toward the input rate either
    assert!(errors.contains(&"No client event timestamp data"));
}

#[test]
fn test_event_loop_mismatch_yields_one_error() {
    let mut events = full_trace();
    events.push(TraceEvent::new(NESTED, DISPATCH_START_EVENT, 100 * MS));

    let root = build_report(Classifier::from_events(&events), &topology());

    let names = data_names(&root);
    assert!(names.iter().all(|n| !n.starts_with("qtmir")));
    assert_eq!(names.len(), 5);
    assert_eq!(
        root.errors(),
        vec!["Cannot calculate QtMir loop data - Dispatch event count did not match surface consume event count"]
    );
}

#[test]
fn test_empty_trace_reports_errors_only() {
    let root = build_report(Classifier::from_events(&Vec::<TraceEvent>::new()), &topology());

    assert!(root.statistics().is_empty());
    // five metrics and one event loop error
    assert_eq!(root.errors().len(), 6);
    assert!(root.errors().contains(&"No nested server touch latency data"));
}

#[test]
fn test_other_processes_are_ignored() {
    let mut events = full_trace();
    events.push(receipt(999, 50 * MS, 40 * MS));
    events.push(TraceEvent::new(999, DISPATCH_START_EVENT, 60 * MS));

    let root = build_report(Classifier::from_events(&events), &topology());

    assert_eq!(root.statistics().len(), 8);
    assert_eq!(root.statistics()[1].samples, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_markup_round_trip_preserves_samples() {
    let events = full_trace();
    let root = build_report(Classifier::from_events(&events), &topology());
    let markup = root.to_markup();

    let parsed = parse_data_elements(&markup).unwrap();
    let blocks = root.statistics();

    assert_eq!(parsed.len(), blocks.len());
    for (data, block) in parsed.iter().zip(blocks) {
        assert_eq!(data.name, block.name);
        assert_eq!(data.values, block.samples);
        assert_eq!(data.count, block.samples.len());
        assert_eq!(data.comment, block.comment);
    }

    let summary = verify_report(&markup).unwrap();
    assert_eq!(summary.data.len(), 8);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.events, events.len());
}

#[test]
fn test_json_lines_trace_end_to_end() {
    let trace = format!(
        r#"{{"name": "{client}", "vpid": 300, "timestamp": 2000000, "event_time": 1000000}}
{{"name": "{client}", "vpid": 300, "timestamp": 5000000, "fields": {{"event_time": "0x2dc6c0"}}}}
{{"name": "unrelated:event", "vpid": 300, "timestamp": 6000000}}"#,
        client = CLIENT_TOUCH_EVENT
    );

    let events = parse_trace(&trace).unwrap();
    assert_eq!(events.len(), 3);

    let root = build_report(Classifier::from_events(&events), &topology());
    let client = root
        .statistics()
        .into_iter()
        .find(|b| b.name == "client_latency")
        .cloned()
        .unwrap();

    // 0x2dc6c0 = 3_000_000
    assert_eq!(client.samples, vec![1.0, 2.0]);
}
