//! Markup report writer.
//!
//! Writes a serialized report tree to disk in one go.

use crate::report::ReportNode;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::path::Path;

/// Write a report tree to a markup file
///
/// **Public** - main entry point for report output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its
///   parent cannot be created
///
/// # Example
/// ```ignore
/// let report = build_report(classifier, &topology);
/// write_report(&report, "touch_event_latency.xml")?;
/// ```
pub fn write_report(report: &ReportNode, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    let written = super::write_document(&report.to_markup(), output_path)?;

    info!("Report written successfully ({} bytes)", written);

    Ok(())
}

/// Read a markup report back as a string
///
/// **Public** - used by the validate command
pub fn read_report(input_path: impl AsRef<Path>) -> Result<String, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    std::fs::read_to_string(input_path).map_err(OutputError::WriteFailed)
}
