//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads the captured trace
//! 2. Classifies events into per-process bins
//! 3. Builds the report tree
//! 4. Renders histograms
//! 5. Writes output files

use super::models::{AnalyzeArgs, HistogramBackend};
use crate::aggregator::Classifier;
use crate::histogram::{render_histograms, HistogramRenderer, RscriptRenderer, SvgHistogramRenderer};
use crate::output::{write_report, write_summary};
use crate::parser::read_trace;
use crate::report::{build_report, ReportSummary};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// Missing data and failed histograms degrade the report but never fail
/// the command. Only unreadable input and unwritable output do.
///
/// # Returns
/// The JSON summary of the written report
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     trace_path: PathBuf::from("trace.json"),
///     topology: Topology::new(1201, 1202, 1203),
///     ..Default::default()
/// };
///
/// execute_analyze(args)?;
/// ```
pub fn execute_analyze(args: AnalyzeArgs) -> Result<ReportSummary> {
    let start_time = Instant::now();

    info!("Analyzing trace: {}", args.trace_path.display());
    info!(
        "Processes: host={} nested={} client={}",
        args.topology.host, args.topology.nested, args.topology.client
    );

    // Step 1: Read trace
    info!("Step 1/5: Reading trace...");
    let events = read_trace(&args.trace_path)
        .with_context(|| format!("Failed to read trace {}", args.trace_path.display()))?;

    // Step 2: Classify
    info!("Step 2/5: Classifying {} events...", events.len());
    let classifier = Classifier::from_events(&events);
    if classifier.missing_event_time() > 0 {
        warn!(
            "{} latency events had no event_time field",
            classifier.missing_event_time()
        );
    }
    if classifier.rejected_latency() > 0 {
        warn!(
            "{} touch receipts dropped for non-positive latency",
            classifier.rejected_latency()
        );
    }
    drop(events);

    // Step 3: Build report
    info!("Step 3/5: Building report...");
    let report = build_report(classifier, &args.topology);
    let summary = ReportSummary::from_report(&report);

    // Step 4: Histograms (if requested)
    match build_renderer(&args) {
        Some(renderer) => {
            info!("Step 4/5: Rendering histograms...");
            let outcome = render_histograms(&report.statistics(), renderer.as_ref());
            debug!(
                "{} histograms rendered, {} failed",
                outcome.rendered.len(),
                outcome.failed.len()
            );
        }
        None => info!("Step 4/5: Skipping histograms (not requested)"),
    }

    // Step 5: Write outputs
    info!("Step 5/5: Writing output files...");
    write_report(&report, &args.output_report).context("Failed to write report")?;
    info!("✓ Report written to: {}", args.output_report.display());

    if let Some(json_path) = &args.output_json {
        write_summary(&summary, json_path).context("Failed to write JSON summary")?;
        info!("✓ Summary written to: {}", json_path.display());
    }

    if args.print_summary {
        println!("\n{}", summary.to_text());
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(summary)
}

/// Select the histogram renderer
///
/// **Private** - internal helper for execute_analyze
fn build_renderer(args: &AnalyzeArgs) -> Option<Box<dyn HistogramRenderer>> {
    match args.histograms {
        HistogramBackend::None => None,
        HistogramBackend::Rscript => {
            let mut renderer = RscriptRenderer::new(&args.histogram_dir).with_program(&args.rscript);
            if let Some(script) = &args.r_script {
                renderer = renderer.with_script(script);
            }
            Some(Box::new(renderer))
        }
        HistogramBackend::Svg => Some(Box::new(SvgHistogramRenderer::new(
            &args.histogram_dir,
            args.histogram_config.clone(),
        ))),
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if !args.trace_path.is_file() {
        anyhow::bail!("Trace file not found: {}", args.trace_path.display());
    }

    let topology = &args.topology;
    let pids = [topology.host, topology.nested, topology.client];

    if pids.contains(&0) {
        anyhow::bail!("Process ids must be non-zero");
    }

    if topology.host == topology.nested
        || topology.host == topology.client
        || topology.nested == topology.client
    {
        anyhow::bail!("Host, nested server and client must be distinct processes");
    }

    if args.output_report.as_os_str().is_empty() {
        anyhow::bail!("Report path cannot be empty");
    }

    if let Some(bins) = args.histogram_config.bins {
        if bins == 0 {
            anyhow::bail!("Histogram bin count must be greater than 0");
        }
    }

    Ok(())
}
