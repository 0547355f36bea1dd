//! Cross-check a serialized report.
//!
//! Re-reads every `data` element and confirms that its `count` matches
//! the listed values and that `mean`/`deviation` agree with a fresh
//! computation over those values.

use crate::aggregator::{mean, sample_std_dev};
use crate::utils::config::VERIFY_TOLERANCE;
use crate::utils::error::VerifyError;
use log::debug;
use regex::Regex;

const DATA_ELEMENT: &str = r"<data name='(?P<name>[^']*)' mean='(?P<mean>[^']*)' deviation='(?P<deviation>[^']*)' comment='(?P<comment>[^']*)' count='(?P<count>[^']*)'><values>(?P<values>[^<]*)</values></data>";

/// A `data` element read back from markup
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedData {
    pub name: String,
    pub mean: f64,
    pub deviation: f64,
    pub comment: String,
    pub count: usize,
    pub values: Vec<f64>,
}

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq)]
pub struct VerifySummary {
    pub data: Vec<ParsedData>,
    pub errors: usize,
    pub events: usize,
}

/// Extract every `data` element from a report
///
/// **Public** - used by `verify_report` and the round-trip tests
pub fn parse_data_elements(markup: &str) -> Result<Vec<ParsedData>, VerifyError> {
    let re = Regex::new(DATA_ELEMENT).map_err(|e| VerifyError::Pattern(e.to_string()))?;

    re.captures_iter(markup)
        .map(|caps| {
            let name = caps["name"].to_string();
            let values = parse_values(&name, &caps["values"])?;
            Ok(ParsedData {
                mean: parse_f64(&name, "mean", &caps["mean"])?,
                deviation: parse_f64(&name, "deviation", &caps["deviation"])?,
                count: caps["count"]
                    .parse()
                    .map_err(|_| invalid(&name, "count", &caps["count"]))?,
                comment: caps["comment"].to_string(),
                values,
                name,
            })
        })
        .collect()
}

/// Verify a whole report
///
/// **Public** - main entry point for report validation
///
/// # Errors
/// * `VerifyError::MissingRoot` - not a `results` document
/// * `VerifyError::CountMismatch` - `count` differs from the value list
/// * `VerifyError::StatisticMismatch` - summary disagrees with the values
pub fn verify_report(markup: &str) -> Result<VerifySummary, VerifyError> {
    let trimmed = markup.trim();
    if !trimmed.starts_with("<results") {
        return Err(VerifyError::MissingRoot);
    }

    let data = parse_data_elements(trimmed)?;
    for element in &data {
        check_element(element)?;
        debug!("{}: {} values verified", element.name, element.count);
    }

    Ok(VerifySummary {
        errors: trimmed.matches("<error ").count(),
        events: trimmed.matches("<event ").count(),
        data,
    })
}

fn check_element(element: &ParsedData) -> Result<(), VerifyError> {
    if element.count != element.values.len() {
        return Err(VerifyError::CountMismatch {
            name: element.name.clone(),
            count: element.count,
            values: element.values.len(),
        });
    }

    let checks = [
        ("mean", element.mean, mean(&element.values)),
        ("deviation", element.deviation, sample_std_dev(&element.values)),
    ];

    for (statistic, declared, computed) in checks {
        // data elements are only written with at least two samples
        let computed = computed.unwrap_or(f64::NAN);
        if !approx_eq(declared, computed) {
            return Err(VerifyError::StatisticMismatch {
                name: element.name.clone(),
                statistic,
                declared,
                computed,
            });
        }
    }

    Ok(())
}

fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= VERIFY_TOLERANCE * scale
}

fn parse_values(name: &str, list: &str) -> Result<Vec<f64>, VerifyError> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',')
        .map(|v| parse_f64(name, "values", v.trim()))
        .collect()
}

fn parse_f64(name: &str, attribute: &'static str, value: &str) -> Result<f64, VerifyError> {
    value.parse().map_err(|_| invalid(name, attribute, value))
}

fn invalid(name: &str, attribute: &'static str, value: &str) -> VerifyError {
    VerifyError::InvalidNumber {
        name: name.to_string(),
        attribute,
        value: value.to_string(),
    }
}
