//! SVG histogram output writer.

use crate::utils::error::OutputError;
use log::{debug, info};
use std::path::Path;

/// Write SVG content to a file
///
/// **Public** - used by the SVG histogram renderer
///
/// # Example
/// ```ignore
/// let svg = render_histogram_svg("client_latency", &samples, &config)?;
/// write_svg(&svg, "client_latency.svg")?;
/// ```
pub fn write_svg(svg_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    if output_path.extension().map_or(true, |ext| ext != "svg") {
        debug!("File does not have .svg extension: {}", output_path.display());
    }

    let written = super::write_document(svg_content, output_path)?;
    info!("Histogram written: {} ({} bytes)", output_path.display(), written);

    Ok(())
}
