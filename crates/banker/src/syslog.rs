//! Request Event Log (SysLog)
//!
//! Records every request (and its verdict) for the audit trail.
//! This is separate from CommitLog - SysLog records everything that was
//! asked, CommitLog only what changed the ledger.

use banker_core::{Denial, Outcome, ProcessId, Units};
use serde::{Deserialize, Serialize};

/// Monotonic event identifier
pub type EventId = u64;

/// A logged event (request or response).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SysEvent {
    /// Unique event ID (monotonic)
    pub id: EventId,
    /// Process that made the request
    pub sender: ProcessId,
    /// Logical time of the event
    pub tick: u64,
    /// Event type (request or response)
    pub event_type: SysEventType,
}

/// Type of logged event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SysEventType {
    /// Allocation request from a process
    Request {
        /// Requested units per class
        units: Vec<Units>,
    },
    /// Verdict on a request
    Response {
        /// ID of the request this responds to
        request_id: EventId,
        /// What was decided
        verdict: Verdict,
    },
}

/// Compact, serializable form of an [`Outcome`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Granted,
    InvalidProcess,
    DimensionMismatch,
    ExceedsClaim,
    InsufficientResources,
    Unsafe,
}

impl From<&Outcome> for Verdict {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Granted { .. } => Verdict::Granted,
            Outcome::Denied(Denial::InvalidProcess { .. }) => Verdict::InvalidProcess,
            Outcome::Denied(Denial::DimensionMismatch { .. }) => Verdict::DimensionMismatch,
            Outcome::Denied(Denial::ExceedsClaim { .. }) => Verdict::ExceedsClaim,
            Outcome::Denied(Denial::InsufficientResources { .. }) => {
                Verdict::InsufficientResources
            }
            Outcome::Denied(Denial::Unsafe { .. }) => Verdict::Unsafe,
        }
    }
}

/// Maximum number of events to keep in memory
const MAX_SYSLOG_EVENTS: usize = 10000;

/// Request event log for auditing.
///
/// Events are append-only with monotonic IDs; the oldest are dropped once
/// the log exceeds its capacity.
pub struct SysLog {
    /// Event entries (append-only)
    events: Vec<SysEvent>,
    /// Next event ID to assign
    next_id: EventId,
    /// Retained event count
    capacity: usize,
}

impl SysLog {
    /// Create a new empty SysLog.
    pub fn new() -> Self {
        Self::with_capacity(MAX_SYSLOG_EVENTS)
    }

    /// Create a SysLog that retains at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            next_id: 0,
            capacity,
        }
    }

    /// Log a request.
    ///
    /// Returns the event ID for correlating with the response.
    pub fn log_request(&mut self, sender: ProcessId, units: &[Units], tick: u64) -> EventId {
        self.push(
            sender,
            tick,
            SysEventType::Request {
                units: units.to_vec(),
            },
        )
    }

    /// Log the verdict for a request.
    pub fn log_response(
        &mut self,
        sender: ProcessId,
        request_id: EventId,
        verdict: Verdict,
        tick: u64,
    ) -> EventId {
        self.push(
            sender,
            tick,
            SysEventType::Response {
                request_id,
                verdict,
            },
        )
    }

    /// Get all retained events.
    pub fn events(&self) -> &[SysEvent] {
        &self.events
    }

    /// Get the most recent N events, newest first.
    pub fn get_recent(&self, count: usize) -> Vec<&SysEvent> {
        self.events.iter().rev().take(count).collect()
    }

    /// Count retained responses with the given verdict.
    pub fn count_verdicts(&self, verdict: Verdict) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    SysEventType::Response { verdict: v, .. } if v == verdict
                )
            })
            .count()
    }

    /// Get the number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the next event ID.
    pub fn next_id(&self) -> EventId {
        self.next_id
    }

    fn push(&mut self, sender: ProcessId, tick: u64, event_type: SysEventType) -> EventId {
        let id = self.next_id;
        self.next_id += 1;

        self.events.push(SysEvent {
            id,
            sender,
            tick,
            event_type,
        });

        self.trim_if_needed();
        id
    }

    /// Trim old events if exceeding capacity.
    fn trim_if_needed(&mut self) {
        if self.events.len() > self.capacity {
            let drain_count = self.events.len() - self.capacity;
            self.events.drain(0..drain_count);
        }
    }
}

impl Default for SysLog {
    fn default() -> Self {
        Self::new()
    }
}
