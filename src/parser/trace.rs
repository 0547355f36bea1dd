//! Captured trace reader.
//!
//! Turns a trace file into an ordered list of `TraceEvent`s. The order
//! of the file is kept as-is: downstream rate and latency math assumes
//! the tracer emitted events chronologically.

use super::schema::{Pid, TraceEvent};
use crate::utils::config::PID_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::{debug, warn};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;

/// Detected encoding of a trace file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// A single JSON document: array of events or `{"events": [...]}`
    JsonDocument,
    /// One JSON event object per line
    JsonLines,
    /// `babeltrace` text output
    BabeltraceText,
}

// Matches: [ts] (+delta) host provider:event: { ... }, { ... }
const BABELTRACE_LINE: &str = r"^\[(?P<ts>\d+(?:\.\d{1,9})?)\]\s+(?:\(\+?[\d.?]+\)\s+)?(?:(?P<host>\S+)\s+)?(?P<name>[A-Za-z0-9_]+:[A-Za-z0-9_]+):\s*(?P<rest>.*)$";
// Integer values only: the value must end at whitespace, ',', '}' or end of line
const BABELTRACE_FIELD: &str = r"(?P<key>[A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?P<value>0x[0-9A-Fa-f]+|\d+)(?:\s|,|\}|$)";

/// Read and parse a trace file
///
/// **Public** - main entry point for trace input
///
/// # Errors
/// * `ParseError::IoError` - File cannot be read
/// * `ParseError::InvalidFormat` - No event in the file could be parsed
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, ParseError> {
    let path = path.as_ref();
    debug!("Reading trace from: {}", path.display());

    let content = std::fs::read_to_string(path)?;
    parse_trace(&content)
}

/// Parse trace content in any supported encoding
///
/// **Public** - used by `read_trace` and tests
pub fn parse_trace(content: &str) -> Result<Vec<TraceEvent>, ParseError> {
    let format = match detect_trace_format(content) {
        Some(format) => format,
        None => {
            warn!("Trace is empty");
            return Ok(Vec::new());
        }
    };

    debug!("Detected trace format: {:?}", format);

    let events = match format {
        TraceFormat::JsonDocument => {
            let value: Value = serde_json::from_str(content)?;
            parse_json_document(&value)?
        }
        TraceFormat::JsonLines => parse_json_lines(content)?,
        TraceFormat::BabeltraceText => parse_babeltrace(content)?,
    };

    debug!("Parsed {} trace events", events.len());
    Ok(events)
}

/// Detect the trace encoding, `None` for empty content
///
/// **Public** - exposed for diagnostics
pub fn detect_trace_format(content: &str) -> Option<TraceFormat> {
    let first_line = content.lines().map(str::trim).find(|l| !l.is_empty())?;

    // babeltrace lines also start with '[', so let the JSON parser decide
    if serde_json::from_str::<Value>(content).is_ok() {
        Some(TraceFormat::JsonDocument)
    } else if first_line.starts_with('{') {
        Some(TraceFormat::JsonLines)
    } else {
        Some(TraceFormat::BabeltraceText)
    }
}

/// Parse a whole-document JSON trace
///
/// **Private** - internal helper for parse_trace
fn parse_json_document(value: &Value) -> Result<Vec<TraceEvent>, ParseError> {
    match value {
        Value::Array(events) => parse_events_array(events),
        Value::Object(obj) => match obj.get("events") {
            Some(Value::Array(events)) => parse_events_array(events),
            Some(_) => Err(ParseError::InvalidFormat(
                "'events' must be an array".to_string(),
            )),
            // a single event object
            None => Ok(vec![parse_event_object(obj)?]),
        },
        _ => Err(ParseError::InvalidFormat(
            "Trace must be a JSON object or array".to_string(),
        )),
    }
}

/// Parse array of event objects
///
/// **Private** - malformed events are logged and skipped
fn parse_events_array(events: &[Value]) -> Result<Vec<TraceEvent>, ParseError> {
    let mut parsed = Vec::with_capacity(events.len());

    for (index, value) in events.iter().enumerate() {
        let result = match value {
            Value::Object(obj) => parse_event_object(obj),
            other => Err(ParseError::InvalidFormat(format!(
                "Expected event object, found {}",
                other
            ))),
        };

        match result {
            Ok(event) => parsed.push(event),
            Err(e) => warn!("Failed to parse event {}: {}", index, e),
        }
    }

    ensure_some_parsed(&parsed, events.len())?;
    Ok(parsed)
}

/// Parse JSON-lines content
///
/// **Private** - internal helper for parse_trace
fn parse_json_lines(content: &str) -> Result<Vec<TraceEvent>, ParseError> {
    let mut parsed = Vec::new();
    let mut total = 0;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        total += 1;

        let result = serde_json::from_str::<Value>(line)
            .map_err(ParseError::from)
            .and_then(|value| match value {
                Value::Object(obj) => parse_event_object(&obj),
                _ => Err(ParseError::InvalidFormat("Expected event object".to_string())),
            });

        match result {
            Ok(event) => parsed.push(event),
            Err(e) => warn!("Failed to parse line {}: {}", line_no + 1, e),
        }
    }

    ensure_some_parsed(&parsed, total)?;
    Ok(parsed)
}

/// Convert a JSON event object into a `TraceEvent`
///
/// **Public** - also used by tests to build events from fixtures
///
/// Recognised members: `pid`/`vpid`, `name`, `timestamp`, `fields`.
/// Any other numeric top-level member is kept as an auxiliary field.
pub fn parse_event_object(obj: &Map<String, Value>) -> Result<TraceEvent, ParseError> {
    let nested_fields = obj.get("fields").and_then(Value::as_object);

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingField("name".to_string()))?;

    let timestamp = obj
        .get("timestamp")
        .ok_or_else(|| ParseError::MissingField("timestamp".to_string()))
        .and_then(parse_json_u64)?;

    let pid = PID_FIELD_NAMES
        .iter()
        .find_map(|key| obj.get(*key).or_else(|| nested_fields.and_then(|f| f.get(*key))))
        .ok_or_else(|| ParseError::MissingField("pid".to_string()))
        .and_then(parse_json_u64)
        .and_then(to_pid)?;

    let mut event = TraceEvent::new(pid, name, timestamp);

    let top_level = obj
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "name" | "timestamp" | "fields"));
    let extra = nested_fields.into_iter().flat_map(|f| f.iter());

    for (key, value) in top_level.chain(extra) {
        if PID_FIELD_NAMES.contains(&key.as_str()) {
            continue;
        }
        match parse_json_u64(value) {
            Ok(v) => {
                event.fields.insert(key.clone(), v);
            }
            Err(_) => debug!("Ignoring non-numeric field '{}' on {}", key, name),
        }
    }

    Ok(event)
}

/// Parse babeltrace text output
///
/// **Private** - internal helper for parse_trace
fn parse_babeltrace(content: &str) -> Result<Vec<TraceEvent>, ParseError> {
    let line_re = Regex::new(BABELTRACE_LINE)?;
    let field_re = Regex::new(BABELTRACE_FIELD)?;

    let mut parsed = Vec::new();
    let mut total = 0;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        total += 1;

        match parse_babeltrace_line(line, &line_re, &field_re) {
            Ok(event) => parsed.push(event),
            Err(e) => warn!("Failed to parse line {}: {}", line_no + 1, e),
        }
    }

    ensure_some_parsed(&parsed, total)?;
    Ok(parsed)
}

/// Parse one babeltrace line
///
/// **Private** - internal helper for parse_babeltrace
fn parse_babeltrace_line(
    line: &str,
    line_re: &Regex,
    field_re: &Regex,
) -> Result<TraceEvent, ParseError> {
    let caps = line_re.captures(line).ok_or_else(|| {
        ParseError::InvalidFormat(
            "Unrecognised babeltrace line (capture with --clock-seconds or --clock-raw)"
                .to_string(),
        )
    })?;

    let timestamp = parse_clock_value(&caps["ts"])?;
    let name = &caps["name"];

    let mut pid = None;
    let mut event = TraceEvent::new(0, name, timestamp);

    for field in field_re.captures_iter(&caps["rest"]) {
        let key = &field["key"];
        let value = parse_numeric_str(&field["value"])?;
        if PID_FIELD_NAMES.contains(&key) {
            pid.get_or_insert(value);
        } else {
            event.fields.insert(key.to_string(), value);
        }
    }

    event.pid = pid
        .ok_or_else(|| ParseError::MissingField("vpid".to_string()))
        .and_then(to_pid)?;

    Ok(event)
}

/// Parse a babeltrace clock column into nanoseconds
///
/// **Public** - accepts raw nanoseconds or `seconds.fraction`
pub fn parse_clock_value(value: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidFormat(format!("Invalid clock value: {}", value));

    match value.split_once('.') {
        None => value.parse::<u64>().map_err(|_| invalid()),
        Some((secs, frac)) => {
            if frac.is_empty() || frac.len() > 9 {
                return Err(invalid());
            }
            let secs = secs.parse::<u64>().map_err(|_| invalid())?;
            // "5" after the dot is 500_000_000 ns
            let nanos = format!("{:0<9}", frac).parse::<u64>().map_err(|_| invalid())?;
            secs.checked_mul(1_000_000_000)
                .and_then(|s| s.checked_add(nanos))
                .ok_or_else(invalid)
        }
    }
}

/// Helper to parse a u64 from various JSON types (number, string)
///
/// **Private** - internal utility
fn parse_json_u64(val: &Value) -> Result<u64, ParseError> {
    if let Some(n) = val.as_u64() {
        Ok(n)
    } else if let Some(s) = val.as_str() {
        parse_numeric_str(s)
    } else {
        Err(ParseError::InvalidFormat(format!(
            "Expected number or string, found {}",
            val
        )))
    }
}

/// Parse a numeric value from hex string or decimal
pub fn parse_numeric_str(value: &str) -> Result<u64, ParseError> {
    // Handle hex values (0x prefix)
    if let Some(hex_str) = value.strip_prefix("0x") {
        u64::from_str_radix(hex_str, 16)
            .map_err(|e| ParseError::InvalidFormat(format!("Invalid hex value: {}", e)))
    } else {
        value
            .parse::<u64>()
            .map_err(|e| ParseError::InvalidFormat(format!("Invalid decimal value: {}", e)))
    }
}

fn to_pid(value: u64) -> Result<Pid, ParseError> {
    Pid::try_from(value)
        .map_err(|_| ParseError::InvalidFormat(format!("Process id out of range: {}", value)))
}

fn ensure_some_parsed(parsed: &[TraceEvent], total: usize) -> Result<(), ParseError> {
    if parsed.is_empty() && total > 0 {
        return Err(ParseError::InvalidFormat(
            "All trace events failed to parse".to_string(),
        ));
    }
    Ok(())
}
