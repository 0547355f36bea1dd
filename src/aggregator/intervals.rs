//! Derive interval metrics from ordered timestamp sequences.
//!
//! All timestamps are nanoseconds and every derived value is in
//! milliseconds.

use crate::utils::config::NANOS_PER_MILLI;
use crate::utils::error::PairingError;
use log::debug;

/// Signed difference `later - earlier` in milliseconds
pub fn nanos_delta_ms(later: u64, earlier: u64) -> f64 {
    (i128::from(later) - i128::from(earlier)) as f64 / NANOS_PER_MILLI
}

/// Differences between consecutive timestamps
///
/// An empty or single-element input yields an empty list; callers treat
/// that as "no data".
pub fn consecutive_intervals(timestamps: &[u64]) -> Vec<f64> {
    timestamps
        .windows(2)
        .map(|pair| nanos_delta_ms(pair[1], pair[0]))
        .collect()
}

/// The four event-loop tracepoint sequences of one process
#[derive(Debug, Clone, Copy)]
pub struct EventLoopTracepoints<'a> {
    pub dispatch_starts: &'a [u64],
    pub dispatch_ends: &'a [u64],
    pub consume_starts: &'a [u64],
    pub consume_ends: &'a [u64],
}

/// Per-event durations derived from paired tracepoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLoopTimings {
    /// dispatch end - dispatch start
    pub dispatch: Vec<f64>,
    /// consume end - consume start
    pub consume: Vec<f64>,
    /// consume start - dispatch end
    pub gap: Vec<f64>,
}

impl EventLoopTimings {
    pub fn len(&self) -> usize {
        self.dispatch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatch.is_empty()
    }
}

impl<'a> EventLoopTracepoints<'a> {
    /// Pair the four sequences by position
    ///
    /// Tracepoints carry no event identifier, so the i-th dispatch start
    /// is assumed to belong to the i-th dispatch end, consume start and
    /// consume end. Interleaved or dropped events break that assumption
    /// and are not detected beyond the length check.
    ///
    /// # Errors
    /// * `PairingError::Empty` - no dispatch starts recorded
    /// * `PairingError::LengthMismatch` - sequences differ in length
    pub fn pair(&self) -> Result<EventLoopTimings, PairingError> {
        let n = self.dispatch_starts.len();

        if n != self.dispatch_ends.len()
            || n != self.consume_starts.len()
            || n != self.consume_ends.len()
        {
            return Err(PairingError::LengthMismatch {
                dispatch_starts: n,
                dispatch_ends: self.dispatch_ends.len(),
                consume_starts: self.consume_starts.len(),
                consume_ends: self.consume_ends.len(),
            });
        }

        if n == 0 {
            return Err(PairingError::Empty);
        }

        let mut timings = EventLoopTimings {
            dispatch: Vec::with_capacity(n),
            consume: Vec::with_capacity(n),
            gap: Vec::with_capacity(n),
        };

        for i in 0..n {
            timings
                .dispatch
                .push(nanos_delta_ms(self.dispatch_ends[i], self.dispatch_starts[i]));
            timings
                .consume
                .push(nanos_delta_ms(self.consume_ends[i], self.consume_starts[i]));
            timings
                .gap
                .push(nanos_delta_ms(self.consume_starts[i], self.dispatch_ends[i]));
        }

        debug!("Paired {} event loop iterations", n);
        Ok(timings)
    }
}
