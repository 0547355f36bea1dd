//! Histogram rendering for computed statistics.
//!
//! Rendering is a side effect of the report: a failed histogram is
//! logged and the report stays valid. Renderers run one at a time and
//! the caller waits for each.

pub mod rscript;
pub mod svg;

pub use rscript::RscriptRenderer;
pub use svg::{render_histogram_svg, HistogramConfig, SvgHistogramRenderer};

use crate::aggregator::StatisticBlock;
use crate::utils::error::HistogramError;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Something that can turn a named sample list into an image file
pub trait HistogramRenderer {
    /// Render `samples` and return the path of the written image
    fn render(&self, name: &str, samples: &[f64]) -> Result<PathBuf, HistogramError>;
}

/// Result of rendering every statistic of a report
#[derive(Debug, Default)]
pub struct HistogramOutcome {
    pub rendered: Vec<PathBuf>,
    /// Names of statistics whose histogram failed
    pub failed: Vec<String>,
}

/// Render one histogram per statistic block, in order
///
/// **Public** - failures are logged, never propagated
pub fn render_histograms(
    blocks: &[&StatisticBlock],
    renderer: &dyn HistogramRenderer,
) -> HistogramOutcome {
    let mut outcome = HistogramOutcome::default();

    for block in blocks {
        match renderer.render(&block.name, &block.samples) {
            Ok(path) => {
                info!("Histogram for {} written to {}", block.name, path.display());
                outcome.rendered.push(path);
            }
            Err(e) => {
                warn!("Failed to generate histogram for {}: {}", block.name, e);
                outcome.failed.push(block.name.clone());
            }
        }
    }

    outcome
}

/// `<dir>/<name>.<extension>`
pub fn image_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::summarize;
    use std::cell::RefCell;

    /// Records calls and fails for one name
    struct FakeRenderer {
        calls: RefCell<Vec<String>>,
        fail_on: &'static str,
    }

    impl HistogramRenderer for FakeRenderer {
        fn render(&self, name: &str, _samples: &[f64]) -> Result<PathBuf, HistogramError> {
            self.calls.borrow_mut().push(name.to_string());
            if name == self.fail_on {
                return Err(HistogramError::EmptySamples(name.to_string()));
            }
            Ok(PathBuf::from(format!("{}.png", name)))
        }
    }

    #[test]
    fn test_failure_does_not_stop_rendering() {
        let a = summarize("a", "", vec![1.0, 2.0]).unwrap();
        let b = summarize("b", "", vec![1.0, 2.0]).unwrap();
        let c = summarize("c", "", vec![1.0, 2.0]).unwrap();
        let renderer = FakeRenderer {
            calls: RefCell::new(Vec::new()),
            fail_on: "b",
        };

        let outcome = render_histograms(&[&a, &b, &c], &renderer);

        assert_eq!(*renderer.calls.borrow(), vec!["a", "b", "c"]);
        assert_eq!(outcome.rendered, vec![PathBuf::from("a.png"), PathBuf::from("c.png")]);
        assert_eq!(outcome.failed, vec!["b".to_string()]);
    }

    #[test]
    fn test_image_path() {
        assert_eq!(
            image_path(Path::new("out"), "client_latency", "png"),
            PathBuf::from("out/client_latency.png")
        );
    }
}
