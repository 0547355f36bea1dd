//! Summary statistics over derived sample lists.

use crate::utils::config::MIN_STATISTIC_SAMPLES;
use crate::utils::error::StatsError;
use log::debug;

/// A named metric with its summary and the complete sample list
///
/// The raw samples are always kept so the summary can be re-checked and
/// the histogram can be plotted from the same data.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticBlock {
    pub name: String,
    pub mean: f64,
    pub deviation: f64,
    pub comment: String,
    pub samples: Vec<f64>,
}

impl StatisticBlock {
    /// Number of samples, always `samples.len()`
    pub fn count(&self) -> usize {
        self.samples.len()
    }
}

/// Build a `StatisticBlock` from a sample list
///
/// **Public** - main entry point for statistics
///
/// # Errors
/// * `StatsError::InsufficientSamples` - fewer than two samples, so the
///   sample standard deviation is undefined
pub fn summarize(
    name: impl Into<String>,
    comment: impl Into<String>,
    samples: Vec<f64>,
) -> Result<StatisticBlock, StatsError> {
    let name = name.into();

    let (mean, deviation) = match (mean(&samples), sample_std_dev(&samples)) {
        (Some(m), Some(d)) => (m, d),
        _ => {
            return Err(StatsError::InsufficientSamples {
                name,
                required: MIN_STATISTIC_SAMPLES,
                actual: samples.len(),
            })
        }
    };

    debug!(
        "{}: mean {:.4} ms, deviation {:.4} ms over {} samples",
        name,
        mean,
        deviation,
        samples.len()
    );

    Ok(StatisticBlock {
        name,
        mean,
        deviation,
        comment: comment.into(),
        samples,
    })
}

/// Arithmetic mean, `None` for an empty list
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample (n - 1) standard deviation, `None` below two samples
pub fn sample_std_dev(samples: &[f64]) -> Option<f64> {
    if samples.len() < MIN_STATISTIC_SAMPLES {
        return None;
    }
    let mean = mean(samples)?;
    let sum_sq: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
    Some((sum_sq / (samples.len() - 1) as f64).sqrt())
}
