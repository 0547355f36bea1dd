//! Recognised tracepoints and their categorisation.
//!
//! Only six tracepoints matter for the latency topology; every other
//! event name is left unclassified.

use crate::utils::config::{
    CLIENT_TOUCH_EVENT, CONSUME_END_EVENT, CONSUME_START_EVENT, DISPATCH_END_EVENT,
    DISPATCH_START_EVENT, SERVER_MOTION_EVENT,
};
use std::fmt;

/// Kind of a recognised tracepoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Touch event received by an input receiver (nested server or client)
    ClientTouchReceipt,
    /// Motion event published by a server's input stack
    ServerMotionPublished,
    /// Nested server starts dispatching a touch event to Qt
    DispatchStart,
    /// Nested server finished dispatching
    DispatchEnd,
    /// Surface item starts consuming a touch event
    ConsumeStart,
    /// Surface item finished consuming
    ConsumeEnd,
}

impl EventKind {
    /// All recognised kinds
    pub const ALL: [EventKind; 6] = [
        Self::ClientTouchReceipt,
        Self::ServerMotionPublished,
        Self::DispatchStart,
        Self::DispatchEnd,
        Self::ConsumeStart,
        Self::ConsumeEnd,
    ];

    /// Map a tracepoint name to its kind, `None` if unrecognised
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            CLIENT_TOUCH_EVENT => Some(Self::ClientTouchReceipt),
            SERVER_MOTION_EVENT => Some(Self::ServerMotionPublished),
            DISPATCH_START_EVENT => Some(Self::DispatchStart),
            DISPATCH_END_EVENT => Some(Self::DispatchEnd),
            CONSUME_START_EVENT => Some(Self::ConsumeStart),
            CONSUME_END_EVENT => Some(Self::ConsumeEnd),
            _ => None,
        }
    }

    /// Tracepoint name as emitted
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientTouchReceipt => CLIENT_TOUCH_EVENT,
            Self::ServerMotionPublished => SERVER_MOTION_EVENT,
            Self::DispatchStart => DISPATCH_START_EVENT,
            Self::DispatchEnd => DISPATCH_END_EVENT,
            Self::ConsumeStart => CONSUME_START_EVENT,
            Self::ConsumeEnd => CONSUME_END_EVENT,
        }
    }

    /// Whether the kind needs the embedded `event_time` field
    pub fn needs_event_time(self) -> bool {
        matches!(self, Self::ClientTouchReceipt | Self::ServerMotionPublished)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
