//! Configuration and constants for the CLI.

/// Current JSON summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Trace timestamps are nanoseconds; every derived metric is in milliseconds
pub const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Sample standard deviation is undefined below this many samples
pub const MIN_STATISTIC_SAMPLES: usize = 2;

// Tracepoint names emitted by the benchmarked processes.
// "Disptach" is how the nested server spells it, do not correct.
pub const CLIENT_TOUCH_EVENT: &str = "mir_client_input_receiver:touch_event";
pub const SERVER_MOTION_EVENT: &str = "mir_server_input:published_motion_event";
pub const DISPATCH_START_EVENT: &str = "qtmirserver:touchEventDisptach_start";
pub const DISPATCH_END_EVENT: &str = "qtmirserver:touchEventDisptach_end";
pub const CONSUME_START_EVENT: &str = "qtmir:touchEventConsume_start";
pub const CONSUME_END_EVENT: &str = "qtmir:touchEventConsume_end";

/// Auxiliary field carrying the kernel-origin timestamp
pub const EVENT_TIME_FIELD: &str = "event_time";

// Field names for the process id (babeltrace context uses vpid)
pub const PID_FIELD_NAMES: &[&str] = &["vpid", "pid"];

// Labels used in the `processes` element
pub const HOST_LABEL: &str = "Host";
pub const NESTED_LABEL: &str = "Nested Server";
pub const CLIENT_LABEL: &str = "Client";

/// Default markup report path
pub const DEFAULT_REPORT_FILE: &str = "touch_event_latency.xml";

/// Default executable for the R histogram renderer
pub const DEFAULT_RSCRIPT: &str = "Rscript";

/// R script bundled into the binary, used when no script path is given
pub const BUNDLED_R_SCRIPT: &str = include_str!("../../scripts/histogram.R");

/// Relative tolerance when cross-checking serialized statistics
pub const VERIFY_TOLERANCE: f64 = 1e-9;
