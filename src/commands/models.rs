use crate::histogram::HistogramConfig;
use crate::parser::Topology;
use crate::utils::config::{DEFAULT_REPORT_FILE, DEFAULT_RSCRIPT};
use clap::ValueEnum;
use std::path::PathBuf;

/// How histograms are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistogramBackend {
    /// Skip histogram rendering
    None,
    /// PNG through an external R script
    Rscript,
    /// SVG rendered in-process
    Svg,
}

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Captured trace file
    pub trace_path: PathBuf,

    /// Pids of the benchmarked processes
    pub topology: Topology,

    /// Output path for the markup report
    pub output_report: PathBuf,

    /// Output path for the JSON summary (optional)
    pub output_json: Option<PathBuf>,

    /// Histogram renderer
    pub histograms: HistogramBackend,

    /// Directory receiving histogram images
    pub histogram_dir: PathBuf,

    /// R interpreter for the Rscript backend
    pub rscript: PathBuf,

    /// R script for the Rscript backend, bundled script when `None`
    pub r_script: Option<PathBuf>,

    /// Settings for the SVG backend
    pub histogram_config: HistogramConfig,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            trace_path: PathBuf::from("trace.json"),
            topology: Topology::new(0, 0, 0),
            output_report: PathBuf::from(DEFAULT_REPORT_FILE),
            output_json: None,
            histograms: HistogramBackend::Rscript,
            histogram_dir: PathBuf::from("."),
            rscript: PathBuf::from(DEFAULT_RSCRIPT),
            r_script: None,
            histogram_config: HistogramConfig::default(),
            print_summary: false,
        }
    }
}
