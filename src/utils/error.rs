//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while reading a captured trace
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read trace: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised by the statistics aggregator
#[derive(Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("Statistic '{name}' needs at least {required} samples, got {actual}")]
    InsufficientSamples {
        name: String,
        required: usize,
        actual: usize,
    },
}

/// Errors raised when pairing event-loop tracepoints
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PairingError {
    #[error("No event loop tracepoints recorded")]
    Empty,

    #[error(
        "Tracepoint counts differ: {dispatch_starts} dispatch starts, {dispatch_ends} dispatch ends, \
         {consume_starts} consume starts, {consume_ends} consume ends"
    )]
    LengthMismatch {
        dispatch_starts: usize,
        dispatch_ends: usize,
        consume_starts: usize,
        consume_ends: usize,
    },
}

/// Errors that can occur while rendering a histogram
#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    ToolFailed { program: String, status: ExitStatus },

    #[error("No samples to plot for '{0}'")]
    EmptySamples(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to write histogram: {0}")]
    Output(#[from] OutputError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors found while cross-checking a serialized report
#[derive(Error, Debug, PartialEq)]
pub enum VerifyError {
    #[error("Report has no <results> root element")]
    MissingRoot,

    #[error("Invalid element pattern: {0}")]
    Pattern(String),

    #[error("Data element '{name}': invalid {attribute} value '{value}'")]
    InvalidNumber {
        name: String,
        attribute: &'static str,
        value: String,
    },

    #[error("Data element '{name}': count is {count} but {values} values are listed")]
    CountMismatch {
        name: String,
        count: usize,
        values: usize,
    },

    #[error("Data element '{name}': {statistic} is {declared} but samples give {computed}")]
    StatisticMismatch {
        name: String,
        statistic: &'static str,
        declared: f64,
        computed: f64,
    },
}
