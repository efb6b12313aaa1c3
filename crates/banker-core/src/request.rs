//! Request processor - the only mutating entry point after construction
//!
//! [`handle_request`] resolves one resource request against the ledger:
//!
//! ```text
//! Received ──validate──▶ Validated ──apply_delta──▶ Speculative ──is_safe──▶ Committed
//!     │                                                   │
//!     └── Denied (no change)                              └── undo_delta ──▶ RolledBack
//! ```
//!
//! Properties:
//!
//! 1. **Deterministic**: same ledger + request always produces the same outcome
//! 2. **At most one mutation**: the ledger changes only when `Granted` is returned
//! 3. **Exact rollback**: an unsafe speculation is undone with the same delta

use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::error::Denial;
use crate::ledger::Ledger;
use crate::safety::{is_safe, SafetyReport};
use crate::types::{ProcessId, ResourceId, SafeSequence, Units};

// ============================================================================
// Results
// ============================================================================

/// Final answer to a request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Allocation committed; the state stays safe via `sequence`
    Granted { sequence: SafeSequence },
    /// Not granted; ledger unchanged
    Denied(Denial),
}

impl Outcome {
    /// Check if the request was granted
    pub fn is_granted(&self) -> bool {
        matches!(self, Outcome::Granted { .. })
    }

    /// The denial reason, if any
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Outcome::Denied(d) => Some(d),
            Outcome::Granted { .. } => None,
        }
    }
}

/// Where a request stopped in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestPhase {
    /// Rejected by a validation gate
    Received,
    /// Passed both gates (transient)
    Validated,
    /// Delta applied, awaiting safety verdict (transient)
    Speculative,
    /// Delta kept
    Committed,
    /// Delta undone after an unsafe verdict
    RolledBack,
}

// ============================================================================
// Commit types for the audit log
// ============================================================================

/// Ledger mutations, for audit and replay
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitType {
    /// Initial state
    Genesis { config: LedgerConfig },
    /// `request` moved from Available to the process's Allocation
    Allocated { pid: ProcessId, request: Vec<Units> },
}

/// Result of handling one request
#[derive(Clone, Debug)]
pub struct StepResult {
    /// The answer
    pub outcome: Outcome,
    /// Terminal lifecycle phase
    pub phase: RequestPhase,
    /// Mutations performed (empty unless granted)
    pub commits: Vec<CommitType>,
}

impl StepResult {
    fn denied(denial: Denial, phase: RequestPhase) -> Self {
        Self {
            outcome: Outcome::Denied(denial),
            phase,
            commits: vec![],
        }
    }
}

// ============================================================================
// Speculative transaction
// ============================================================================

/// A delta applied to the ledger that is undone on drop unless committed.
struct Speculation<'a> {
    ledger: &'a mut Ledger,
    pid: ProcessId,
    request: &'a [Units],
    committed: bool,
}

impl<'a> Speculation<'a> {
    fn begin(ledger: &'a mut Ledger, pid: ProcessId, request: &'a [Units]) -> Self {
        ledger.apply_delta(pid, request);
        Self {
            ledger,
            pid,
            request,
            committed: false,
        }
    }

    fn check(&self) -> SafetyReport {
        is_safe(&self.ledger.snapshot())
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.ledger.undo_delta(self.pid, self.request);
        }
    }
}

// ============================================================================
// Validation gates
// ============================================================================

/// Check a request against the ledger without touching it.
///
/// Gates, in order: process index, vector length, `request <= Need[pid]`,
/// `request <= Available`. The first failing gate wins.
pub fn validate(ledger: &Ledger, pid: ProcessId, request: &[Units]) -> Result<(), Denial> {
    let need = ledger.need(pid).ok_or(Denial::InvalidProcess {
        pid,
        processes: ledger.processes(),
    })?;

    if request.len() != ledger.resources() {
        return Err(Denial::DimensionMismatch {
            expected: ledger.resources(),
            actual: request.len(),
        });
    }

    for (j, (&requested, &need)) in request.iter().zip(need).enumerate() {
        if requested > need {
            return Err(Denial::ExceedsClaim {
                pid,
                resource: ResourceId(j),
                requested,
                need,
            });
        }
    }

    for (j, (&requested, &available)) in request.iter().zip(ledger.available()).enumerate() {
        if requested > available {
            return Err(Denial::InsufficientResources {
                resource: ResourceId(j),
                requested,
                available,
            });
        }
    }

    Ok(())
}

// ============================================================================
// The request processor
// ============================================================================

/// Handle one resource request from `pid`.
///
/// Validates, speculatively applies the delta, runs the safety check and
/// either commits or rolls back. The ledger is modified only when the
/// outcome is [`Outcome::Granted`].
pub fn handle_request(ledger: &mut Ledger, pid: ProcessId, request: &[Units]) -> StepResult {
    if let Err(denial) = validate(ledger, pid, request) {
        return StepResult::denied(denial, RequestPhase::Received);
    }

    let speculation = Speculation::begin(ledger, pid, request);
    let (safe, sequence) = speculation.check().into_parts();

    if !safe {
        drop(speculation);
        return StepResult::denied(Denial::Unsafe { pid }, RequestPhase::RolledBack);
    }

    speculation.commit();

    StepResult {
        outcome: Outcome::Granted { sequence },
        phase: RequestPhase::Committed,
        commits: vec![CommitType::Allocated {
            pid,
            request: request.to_vec(),
        }],
    }
}
