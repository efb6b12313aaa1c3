//! Safety check - does some completion order exist?
//!
//! The search works on a copy of Available (`work`) and a `finish` flag per
//! process. Processes are scanned in ascending index order; a process whose
//! Need fits in `work` is marked finishable, its Allocation is released into
//! `work`, and the scan *continues* from the next index. Passes repeat until
//! one makes no progress. The state is safe iff every process finished.
//!
//! The scan order is the tie-break: the same snapshot always yields the same
//! sequence.
//!
//! Nothing here mutates the ledger.

use alloc::vec;

use crate::ledger::Snapshot;
use crate::types::{ProcessId, SafeSequence, Units};

/// Result of a safety check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafetyReport {
    safe: bool,
    sequence: SafeSequence,
}

impl SafetyReport {
    /// Whether every process can run to completion
    pub fn is_safe(&self) -> bool {
        self.safe
    }

    /// The completion order found. Incomplete when the state is unsafe.
    pub fn sequence(&self) -> &SafeSequence {
        &self.sequence
    }

    /// Split into `(safe, sequence)`.
    pub fn into_parts(self) -> (bool, SafeSequence) {
        (self.safe, self.sequence)
    }
}

/// `need <= work`, element-wise
fn fits(need: &[Units], work: &[Units]) -> bool {
    need.iter().zip(work).all(|(n, w)| n <= w)
}

/// Release a finished process's allocation into `work`
fn release(work: &mut [Units], allocation: &[Units]) {
    for (w, &held) in work.iter_mut().zip(allocation) {
        *w = w.saturating_add(held);
    }
}

/// Search for a safe completion sequence.
pub fn is_safe(snapshot: &Snapshot<'_>) -> SafetyReport {
    let n = snapshot.processes();
    let mut work = snapshot.available.to_vec();
    let mut finish = vec![false; n];
    let mut sequence = SafeSequence::with_capacity(n);

    while sequence.len() < n {
        let mut progressed = false;

        for i in 0..n {
            if finish[i] || !fits(&snapshot.need[i], &work) {
                continue;
            }
            release(&mut work, &snapshot.allocation[i]);
            finish[i] = true;
            sequence.push(ProcessId(i));
            progressed = true;
        }

        if !progressed {
            break;
        }
    }

    SafetyReport {
        safe: finish.iter().all(|&done| done),
        sequence,
    }
}

/// Replay `sequence` against a fresh `work` vector.
///
/// Returns true iff the sequence names every process exactly once and each
/// process's Need fits in the units freed by the processes before it.
pub fn verify_sequence(snapshot: &Snapshot<'_>, sequence: &[ProcessId]) -> bool {
    let n = snapshot.processes();
    if sequence.len() != n {
        return false;
    }

    let mut work = snapshot.available.to_vec();
    let mut seen = vec![false; n];

    for pid in sequence {
        let i = pid.0;
        if i >= n || seen[i] || !fits(&snapshot.need[i], &work) {
            return false;
        }
        release(&mut work, &snapshot.allocation[i]);
        seen[i] = true;
    }

    true
}
