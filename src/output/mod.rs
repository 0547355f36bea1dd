//! Output writers for reports, summaries and histograms.
//!
//! This module handles writing data to disk in various formats:
//! - Markup latency reports
//! - JSON summaries
//! - SVG histograms

pub mod json;
pub mod markup;
pub mod svg;

// Re-export main functions
pub use json::{read_summary, write_summary};
pub use markup::{read_report, write_report};
pub use svg::write_svg;

use crate::utils::error::OutputError;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a text document to `path`, creating parent directories
///
/// **Public** - shared by the markup and SVG writers
///
/// # Returns
/// Number of bytes written
pub fn write_document(content: &str, path: &Path) -> Result<usize, OutputError> {
    validate_path(path)?;
    ensure_parent_dir(path)?;

    let file = File::create(path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(content.len())
}

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create parent directories of an output file if needed
pub fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
