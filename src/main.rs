//! Touch Latency CLI
//!
//! Measures end-to-end touch input latency across a host compositor,
//! a nested server and a client from a captured trace.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use touch_latency_trace::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs, HistogramBackend,
};
use touch_latency_trace::histogram::HistogramConfig;
use touch_latency_trace::parser::{Pid, Topology};
use touch_latency_trace::utils::config::{DEFAULT_REPORT_FILE, DEFAULT_RSCRIPT};

/// Touch Latency - input latency analysis for nested compositors
#[derive(Parser, Debug)]
#[command(name = "touch-latency")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a captured trace and write the latency report
    Analyze {
        /// Captured trace (JSON, JSON lines or babeltrace text)
        #[arg(short, long)]
        trace: PathBuf,

        /// Pid of the host compositor
        #[arg(long, env = "TOUCH_LATENCY_HOST_PID")]
        host_pid: Pid,

        /// Pid of the nested server
        #[arg(long, env = "TOUCH_LATENCY_NESTED_PID")]
        nested_pid: Pid,

        /// Pid of the client
        #[arg(long, env = "TOUCH_LATENCY_CLIENT_PID")]
        client_pid: Pid,

        /// Output path for the markup report
        #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
        output: PathBuf,

        /// Output path for the JSON summary (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Histogram backend
        #[arg(long, value_enum, default_value_t = HistogramBackend::Rscript)]
        histograms: HistogramBackend,

        /// Directory receiving histogram images
        #[arg(long, default_value = ".")]
        histogram_dir: PathBuf,

        /// R interpreter used by the rscript backend
        #[arg(long, default_value = DEFAULT_RSCRIPT)]
        rscript: PathBuf,

        /// R script used by the rscript backend (bundled script if omitted)
        #[arg(long)]
        r_script: Option<PathBuf>,

        /// Fixed bin count for SVG histograms
        #[arg(long)]
        bins: Option<usize>,

        /// Title prefix for SVG histograms
        #[arg(long)]
        title: Option<String>,

        /// SVG histogram width in pixels
        #[arg(long, default_value = "800")]
        width: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a markup report file
    Validate {
        /// Path to the report
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            trace,
            host_pid,
            nested_pid,
            client_pid,
            output,
            json,
            histograms,
            histogram_dir,
            rscript,
            r_script,
            bins,
            title,
            width,
            summary,
        } => {
            let histogram_config = histogram_config(bins, title, width);

            let args = AnalyzeArgs {
                trace_path: trace,
                topology: Topology::new(host_pid, nested_pid, client_pid),
                output_report: output,
                output_json: json,
                histograms,
                histogram_dir,
                rscript,
                r_script,
                histogram_config,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Build the SVG histogram settings from CLI options
///
/// The bin count is passed through unchanged so `validate_args` sees it.
fn histogram_config(bins: Option<usize>, title: Option<String>, width: usize) -> HistogramConfig {
    let mut config = HistogramConfig::new();
    if let Some(title_str) = title {
        config = config.with_title(title_str);
    }
    config.bins = bins;
    config.width = width;
    config
}
