//! Deterministic replay of a commit log.
//!
//! Rebuilds a ledger from the genesis commit and pushes every recorded
//! allocation back through the request processor. Each commit must be granted
//! again and leave all invariants intact; the result must equal the ledger
//! that produced the log.

use banker_core::{check_all_invariants, handle_request, CommitType, Ledger, Outcome};
use tracing::debug;

use crate::commitlog::CommitLog;
use crate::error::ReplayError;

/// Rebuild a ledger from `log`.
pub fn replay(log: &CommitLog) -> Result<Ledger, ReplayError> {
    let mut commits = log.commits().iter();

    let mut ledger = match commits.next().map(|c| &c.commit_type) {
        Some(CommitType::Genesis { config }) => Ledger::new(config)?,
        _ => return Err(ReplayError::MissingGenesis),
    };

    for commit in commits {
        let (pid, request) = match &commit.commit_type {
            CommitType::Allocated { pid, request } => (*pid, request),
            CommitType::Genesis { .. } => {
                return Err(ReplayError::UnexpectedGenesis { seq: commit.seq })
            }
        };

        let result = handle_request(&mut ledger, pid, request);
        if let Outcome::Denied(denial) = result.outcome {
            return Err(ReplayError::Rejected {
                seq: commit.seq,
                denial,
            });
        }

        if let Some(v) = check_all_invariants(&ledger).into_iter().next() {
            return Err(ReplayError::InvariantViolated {
                seq: commit.seq,
                invariant: v.invariant,
                description: v.description,
            });
        }

        debug!(seq = commit.seq, %pid, "replayed allocation");
    }

    Ok(ledger)
}

/// Replay `log` and compare the result with `live`.
pub fn replay_and_verify(log: &CommitLog, live: &Ledger) -> Result<(), ReplayError> {
    let rebuilt = replay(log)?;
    if &rebuilt != live {
        return Err(ReplayError::Diverged);
    }
    Ok(())
}
