//! Built-in SVG histogram renderer.
//!
//! Draws the sample distribution without any external tool:
//! - Sturges-rule bin count unless configured
//! - One bar per bin, tooltip with its range and count
//! - Axis labels in milliseconds

use super::{image_path, HistogramRenderer};
use crate::aggregator::{mean, sample_std_dev};
use crate::output::write_svg;
use crate::utils::error::HistogramError;
use log::info;
use std::path::PathBuf;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const BAR_COLOR: &str = "rgb(70, 130, 180)"; // Steel Blue

/// Histogram configuration
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    pub width: usize,
    pub height: usize,
    /// Fixed bin count; Sturges' rule when `None`
    pub bins: Option<usize>,
    /// Title prefix, the statistic name is appended
    pub title: Option<String>,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            bins: None,
            title: None,
        }
    }
}

impl HistogramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins.max(1));
        self
    }
}

/// One histogram bar
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Writes `<dir>/<name>.svg`
#[derive(Debug, Clone)]
pub struct SvgHistogramRenderer {
    output_dir: PathBuf,
    config: HistogramConfig,
}

impl SvgHistogramRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, config: HistogramConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
        }
    }
}

impl HistogramRenderer for SvgHistogramRenderer {
    fn render(&self, name: &str, samples: &[f64]) -> Result<PathBuf, HistogramError> {
        let svg = render_histogram_svg(name, samples, &self.config)?;
        let path = image_path(&self.output_dir, name, "svg");
        write_svg(&svg, &path)?;
        Ok(path)
    }
}

/// Bin count from Sturges' rule, `ceil(log2 n) + 1`
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

/// Split samples into `bins` equal-width bins over their range
///
/// The last bin is closed on the right so the maximum is counted.
pub fn bin_samples(samples: &[f64], bins: usize) -> Vec<Bin> {
    if samples.is_empty() {
        return Vec::new();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // all samples equal: a single bar
    if max <= min {
        return vec![Bin {
            lower: min,
            upper: max,
            count: samples.len(),
        }];
    }

    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &x in samples {
        let index = (((x - min) / width).floor() as usize).min(bins - 1);
        out[index].count += 1;
    }

    out
}

/// Generate the SVG document for one statistic
///
/// **Public** - used by `SvgHistogramRenderer` and tests
pub fn render_histogram_svg(
    name: &str,
    samples: &[f64],
    config: &HistogramConfig,
) -> Result<String, HistogramError> {
    if samples.is_empty() {
        return Err(HistogramError::EmptySamples(name.to_string()));
    }

    let bin_count = config.bins.unwrap_or_else(|| sturges_bins(samples.len()));
    let bins = bin_samples(samples, bin_count);
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(1).max(1);

    let width = config.width as f64;
    let height = config.height as f64;
    let plot_w = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_h = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    let bar_w = plot_w / bins.len() as f64;
    let baseline = MARGIN_TOP + plot_h;

    let title = match &config.title {
        Some(prefix) => format!("{} - {}", prefix, name),
        None => name.to_string(),
    };

    let mut svg_content = String::new();

    svg_content.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        config.width, config.height, config.width, config.height
    ));
    svg_content.push_str(
        r#"<style>.bar:hover { stroke: black; stroke-width: 1; opacity: 0.9; } text { font-family: sans-serif; }</style>"#,
    );
    svg_content.push_str(&format!(
        r#"<text x="{}" y="24" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
        width / 2.0,
        title
    ));

    for (i, bin) in bins.iter().enumerate() {
        let bar_h = plot_h * bin.count as f64 / max_count as f64;
        let x = MARGIN_LEFT + bar_w * i as f64;
        svg_content.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" class="bar"><title>{:.4} - {:.4} ms: {}</title></rect>"#,
            x,
            baseline - bar_h,
            (bar_w - 1.0).max(0.5),
            bar_h,
            BAR_COLOR,
            bin.lower,
            bin.upper,
            bin.count
        ));
    }

    render_axes(&mut svg_content, &bins, max_count, width, baseline);
    render_legend(&mut svg_content, samples, width);

    svg_content.push_str("</svg>");

    info!("Histogram {} generated ({} bins, {} bytes)", name, bins.len(), svg_content.len());
    Ok(svg_content)
}

fn render_axes(out: &mut String, bins: &[Bin], max_count: usize, width: f64, baseline: f64) {
    let right = width - MARGIN_RIGHT;

    out.push_str(&format!(
        r#"<line x1="{}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black"/>"#,
        MARGIN_LEFT, baseline, right, baseline
    ));
    out.push_str(&format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{:.2}" stroke="black"/>"#,
        MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, baseline
    ));

    if let (Some(first), Some(last)) = (bins.first(), bins.last()) {
        out.push_str(&format!(
            r#"<text x="{}" y="{:.2}" font-size="11" text-anchor="start">{:.4}</text>"#,
            MARGIN_LEFT,
            baseline + 16.0,
            first.lower
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="11" text-anchor="end">{:.4}</text>"#,
            right,
            baseline + 16.0,
            last.upper
        ));
    }

    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-size="12" text-anchor="middle">milliseconds</text>"#,
        MARGIN_LEFT + (right - MARGIN_LEFT) / 2.0,
        baseline + 36.0
    ));
    out.push_str(&format!(
        r#"<text x="{}" y="{}" font-size="11" text-anchor="end">{}</text>"#,
        MARGIN_LEFT - 6.0,
        MARGIN_TOP + 4.0,
        max_count
    ));
    out.push_str(&format!(
        r#"<text x="16" y="{:.2}" font-size="12" text-anchor="middle" transform="rotate(-90 16 {:.2})">count</text>"#,
        MARGIN_TOP + (baseline - MARGIN_TOP) / 2.0,
        MARGIN_TOP + (baseline - MARGIN_TOP) / 2.0
    ));
}

fn render_legend(out: &mut String, samples: &[f64], width: f64) {
    let mean = mean(samples).unwrap_or(0.0);
    let text = match sample_std_dev(samples) {
        Some(dev) => format!("n = {}, mean = {:.4} ms, sd = {:.4} ms", samples.len(), mean, dev),
        None => format!("n = {}, mean = {:.4} ms", samples.len(), mean),
    };
    out.push_str(&format!(
        r#"<text x="{:.2}" y="24" font-size="11" text-anchor="end">{}</text>"#,
        width - MARGIN_RIGHT,
        text
    ));
}
