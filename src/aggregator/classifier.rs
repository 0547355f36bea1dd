//! Route trace events into per-process bins.
//!
//! A single pass over the trace fills every bin the report needs. All
//! state lives in the `Classifier` and is dropped once statistics are
//! derived.

use super::bins::ProcessBins;
use super::intervals::{nanos_delta_ms, EventLoopTracepoints};
use crate::parser::{EventKind, Pid, TraceEvent};
use crate::report::EventRecord;
use log::{debug, info};

/// Classified view of one trace
#[derive(Debug, Default)]
pub struct Classifier {
    /// Kernel-to-receiver latency samples (ms), positive only
    touch_latency: ProcessBins<f64>,
    /// Receive timestamps of the receipts kept in `touch_latency`
    touch_receipts: ProcessBins<u64>,
    /// Source timestamps of published motion events
    motion_published: ProcessBins<u64>,
    dispatch_starts: ProcessBins<u64>,
    dispatch_ends: ProcessBins<u64>,
    consume_starts: ProcessBins<u64>,
    consume_ends: ProcessBins<u64>,
    /// Every observed event, classified or not
    events: Vec<EventRecord>,
    rejected_latency: usize,
    missing_event_time: usize,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every event of a trace in order
    ///
    /// **Public** - main entry point for classification
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a TraceEvent>) -> Self {
        let mut classifier = Self::new();
        for event in events {
            classifier.classify(event);
        }

        info!(
            "Classified {} events ({} latency samples, {} rejected as non-positive)",
            classifier.events.len(),
            classifier.touch_latency.total_len(),
            classifier.rejected_latency
        );
        debug!(
            "Touch receipts from pids {:?}, motion events from pids {:?}",
            classifier.touch_receipts.pids(),
            classifier.motion_published.pids()
        );

        classifier
    }

    /// Record one event and bin it if its kind is recognised
    ///
    /// Returns the kind the event was binned under, `None` if it was only
    /// recorded in the event list.
    pub fn classify(&mut self, event: &TraceEvent) -> Option<EventKind> {
        self.events.push(EventRecord::from(event));

        let kind = EventKind::from_name(&event.name)?;
        let pid = event.pid;

        if kind.needs_event_time() && !self.has_event_time(event) {
            return None;
        }

        match kind {
            EventKind::ClientTouchReceipt => {
                let source = event.event_time()?;
                let latency = nanos_delta_ms(event.timestamp, source);
                // clock skew or reordering can give a non-positive latency
                if latency > 0.0 {
                    self.touch_latency.push(pid, latency);
                    self.touch_receipts.push(pid, event.timestamp);
                } else {
                    self.rejected_latency += 1;
                    return None;
                }
            }
            EventKind::ServerMotionPublished => {
                let source = event.event_time()?;
                self.motion_published.push(pid, source);
            }
            EventKind::DispatchStart => self.dispatch_starts.push(pid, event.timestamp),
            EventKind::DispatchEnd => self.dispatch_ends.push(pid, event.timestamp),
            EventKind::ConsumeStart => self.consume_starts.push(pid, event.timestamp),
            EventKind::ConsumeEnd => self.consume_ends.push(pid, event.timestamp),
        }

        Some(kind)
    }

    fn has_event_time(&mut self, event: &TraceEvent) -> bool {
        if event.event_time().is_some() {
            return true;
        }
        debug!(
            "{} from pid {} has no event_time field, skipping",
            event.name, event.pid
        );
        self.missing_event_time += 1;
        false
    }

    /// Touch latency samples of a receiving process (ms)
    pub fn touch_latency(&self, pid: Pid) -> &[f64] {
        self.touch_latency.get(pid)
    }

    /// Receive timestamps of a receiving process
    pub fn touch_receipts(&self, pid: Pid) -> &[u64] {
        self.touch_receipts.get(pid)
    }

    /// Source timestamps of motion events published by a server
    pub fn motion_published(&self, pid: Pid) -> &[u64] {
        self.motion_published.get(pid)
    }

    /// Event loop tracepoints of one process
    pub fn event_loop(&self, pid: Pid) -> EventLoopTracepoints<'_> {
        EventLoopTracepoints {
            dispatch_starts: self.dispatch_starts.get(pid),
            dispatch_ends: self.dispatch_ends.get(pid),
            consume_starts: self.consume_starts.get(pid),
            consume_ends: self.consume_ends.get(pid),
        }
    }

    /// Every event seen so far, in trace order
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Take the event list, dropping every bin
    pub fn into_events(self) -> Vec<EventRecord> {
        self.events
    }

    /// Client receipts dropped for non-positive latency
    pub fn rejected_latency(&self) -> usize {
        self.rejected_latency
    }

    /// Latency-relevant events that lacked `event_time`
    pub fn missing_event_time(&self) -> usize {
        self.missing_event_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::{
        CLIENT_TOUCH_EVENT, CONSUME_START_EVENT, DISPATCH_START_EVENT, SERVER_MOTION_EVENT,
    };

    fn receipt(pid: Pid, source: u64, received: u64) -> TraceEvent {
        TraceEvent::new(pid, CLIENT_TOUCH_EVENT, received).with_field("event_time", source)
    }

    #[test]
    fn test_latency_filtering() {
        let mut classifier = Classifier::new();

        assert_eq!(classifier.classify(&receipt(7, 1000, 900)), None);
        assert_eq!(
            classifier.classify(&receipt(7, 1000, 1200)),
            Some(EventKind::ClientTouchReceipt)
        );

        assert_eq!(classifier.touch_latency(7), &[0.0002]);
        assert_eq!(classifier.touch_receipts(7), &[1200]);
        assert_eq!(classifier.rejected_latency(), 1);
        // zero latency is rejected too
        classifier.classify(&receipt(7, 5000, 5000));
        assert_eq!(classifier.touch_latency(7).len(), 1);
    }

    #[test]
    fn test_motion_uses_source_timestamp() {
        let mut classifier = Classifier::new();
        let event = TraceEvent::new(1, SERVER_MOTION_EVENT, 9000).with_field("event_time", 4000);

        classifier.classify(&event);

        assert_eq!(classifier.motion_published(1), &[4000]);
    }

    #[test]
    fn test_event_loop_needs_no_event_time() {
        let mut classifier = Classifier::new();

        assert_eq!(
            classifier.classify(&TraceEvent::new(3, DISPATCH_START_EVENT, 100)),
            Some(EventKind::DispatchStart)
        );
        assert_eq!(classifier.event_loop(3).dispatch_starts, &[100]);
        assert_eq!(classifier.missing_event_time(), 0);
    }

    #[test]
    fn test_missing_event_time() {
        let mut classifier = Classifier::new();
        let event = TraceEvent::new(1, SERVER_MOTION_EVENT, 9000);

        assert_eq!(classifier.classify(&event), None);
        assert!(classifier.motion_published(1).is_empty());
        assert_eq!(classifier.missing_event_time(), 1);
        assert_eq!(classifier.events().len(), 1);
    }

    #[test]
    fn test_every_event_is_recorded() {
        let events = vec![
            TraceEvent::new(3, "sched:sched_switch", 10),
            TraceEvent::new(3, DISPATCH_START_EVENT, 20),
            TraceEvent::new(4, CONSUME_START_EVENT, 30),
        ];

        let classifier = Classifier::from_events(&events);

        assert_eq!(classifier.events().len(), 3);
        assert_eq!(classifier.events()[0].name, "sched:sched_switch");
        assert_eq!(classifier.event_loop(3).dispatch_starts, &[20]);
        assert!(classifier.event_loop(3).consume_starts.is_empty());
        assert_eq!(classifier.event_loop(4).consume_starts, &[30]);
    }
}
