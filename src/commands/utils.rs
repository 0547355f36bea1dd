use crate::output::read_report;
use crate::parser::EventKind;
use crate::report::verify_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a markup report file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let markup = read_report(&file_path)?;
    let summary = verify_report(&markup)
        .with_context(|| format!("Report {} failed verification", file_path.display()))?;

    println!("✓ Valid latency report");
    println!("  Statistics: {}", summary.data.len());
    for data in &summary.data {
        println!(
            "    {:<20} n={:<6} mean={:.4} ms  sd={:.4} ms",
            data.name, data.count, data.mean, data.deviation
        );
    }
    println!("  Errors: {}", summary.errors);
    println!("  Events: {}", summary.events);

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Touch Latency Report Schema");
    println!("JSON Summary Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Markup report:");
        println!("  <results>                        - Document root");
        println!("    <processes>                    - Benchmarked processes");
        println!("      <process name pid/>          - Host, Nested Server, Client");
        println!("    <data name mean deviation comment count>");
        println!("      <values>v1,v2,...</values>   - Every sample, milliseconds");
        println!("    <error comment/>               - Metric that could not be computed");
        println!("    <events>                       - Every trace event, in trace order");
        println!("      <event pid name timestamp/>");
        println!();
        println!("Recognised tracepoints:");
        for kind in EventKind::ALL {
            let note = if kind.needs_event_time() { " (event_time)" } else { "" };
            println!("  {}{}", kind, note);
        }
        println!();
        println!("JSON summary:");
        println!("  version: string        - Schema version (e.g., '1.0.0')");
        println!("  processes: array       - name, pid");
        println!("  statistics: array      - name, mean, deviation, count, comment");
        println!("  errors: array          - Error comments");
        println!("  event_count: number    - Events in the trace");
        println!("  generated_at: string   - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Touch Latency Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("End-to-end touch input latency analysis for nested compositor traces.");
}
