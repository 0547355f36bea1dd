use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use touch_latency_trace::commands::{execute_analyze, validate_args, AnalyzeArgs, HistogramBackend};
use touch_latency_trace::output::{read_report, read_summary};
use touch_latency_trace::parser::Topology;
use touch_latency_trace::report::verify_report;

const TRACE: &str = r#"{
  "events": [
    {"name": "mir_server_input:published_motion_event", "vpid": 10, "timestamp": 1100000, "event_time": 1000000},
    {"name": "mir_server_input:published_motion_event", "vpid": 10, "timestamp": 2100000, "event_time": 2000000},
    {"name": "mir_server_input:published_motion_event", "vpid": 10, "timestamp": 4100000, "event_time": 4000000},
    {"name": "mir_client_input_receiver:touch_event", "vpid": 20, "timestamp": 1500000, "event_time": 1000000},
    {"name": "mir_client_input_receiver:touch_event", "vpid": 20, "timestamp": 2500000, "event_time": 2000000},
    {"name": "mir_client_input_receiver:touch_event", "vpid": 20, "timestamp": 4500000, "event_time": 4000000},
    {"name": "mir_client_input_receiver:touch_event", "vpid": 30, "timestamp": 3000000, "event_time": 1000000},
    {"name": "mir_client_input_receiver:touch_event", "vpid": 30, "timestamp": 5000000, "event_time": 2000000},
    {"name": "mir_client_input_receiver:touch_event", "vpid": 30, "timestamp": 6500000, "event_time": 4000000}
  ]
}"#;

fn analyze_args(dir: &TempDir, histograms: HistogramBackend) -> AnalyzeArgs {
    let trace_path = dir.path().join("trace.json");
    fs::write(&trace_path, TRACE).unwrap();

    AnalyzeArgs {
        trace_path,
        topology: Topology::new(10, 20, 30),
        output_report: dir.path().join("out").join("touch_event_latency.xml"),
        output_json: Some(dir.path().join("summary.json")),
        histograms,
        histogram_dir: dir.path().join("histograms"),
        ..Default::default()
    }
}

#[test]
fn test_analyze_writes_report_and_summary() {
    let dir = TempDir::new().unwrap();
    let args = analyze_args(&dir, HistogramBackend::None);
    validate_args(&args).unwrap();

    let summary = execute_analyze(args.clone()).unwrap();

    let markup = read_report(&args.output_report).unwrap();
    assert!(markup.starts_with("<results>"));
    assert!(markup.ends_with("</results>"));

    let verified = verify_report(&markup).unwrap();
    let names: Vec<_> = verified.data.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "nested_latency",
            "client_latency",
            "host_input_rate",
            "nested_input_rate",
            "client_input_rate",
        ]
    );
    // no event loop tracepoints in the trace
    assert_eq!(verified.errors, 1);
    assert_eq!(verified.events, 9);

    let from_disk = read_summary(args.output_json.as_ref().unwrap()).unwrap();
    assert_eq!(from_disk.version, summary.version);
    assert_eq!(from_disk.event_count, 9);
    assert_eq!(from_disk.errors, summary.errors);
    assert_eq!(from_disk.statistics.len(), 5);
    assert_eq!(from_disk.statistic("client_latency").unwrap().mean, 2.5);
    assert_eq!(from_disk.statistic("host_input_rate").unwrap().count, 2);
}

#[test]
fn test_analyze_with_svg_histograms() {
    let dir = TempDir::new().unwrap();
    let args = analyze_args(&dir, HistogramBackend::Svg);

    let summary = execute_analyze(args.clone()).unwrap();

    for stat in &summary.statistics {
        let path = args.histogram_dir.join(format!("{}.svg", stat.name));
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(!args.histogram_dir.join("qtmir_dispatch.svg").exists());
}

#[test]
fn test_failed_histogram_tool_keeps_report() {
    let dir = TempDir::new().unwrap();
    let args = AnalyzeArgs {
        rscript: "definitely-not-an-installed-program-4711".into(),
        ..analyze_args(&dir, HistogramBackend::Rscript)
    };

    execute_analyze(args.clone()).unwrap();

    let markup = read_report(&args.output_report).unwrap();
    assert!(verify_report(&markup).is_ok());
}

#[test]
fn test_unreadable_trace_fails() {
    let dir = TempDir::new().unwrap();
    let args = analyze_args(&dir, HistogramBackend::None);
    fs::write(&args.trace_path, "this is not a trace").unwrap();

    assert!(execute_analyze(args.clone()).is_err());
    assert!(!args.output_report.exists());
}
