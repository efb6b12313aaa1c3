//! System - the single coordinator around one ledger.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          SYSTEM                             │
//! │                                                             │
//! │   request(pid, units)                                       │
//! │     1. SysLog.log_request                                   │
//! │     2. banker_core::handle_request   (pure)                 │
//! │     3. CommitLog.append for each commit                     │
//! │     4. SysLog.log_response                                  │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `request` takes `&mut self`, so requests are serialized by the borrow
//! checker; the speculative apply/rollback in the core is never interleaved.

use banker_core::{
    handle_request, ConfigError, Denial, Ledger, LedgerConfig, Outcome, ProcessId, SafetyReport,
    Snapshot, Units,
};
use tracing::{debug, info, warn};

use crate::commitlog::CommitLog;
use crate::error::ReplayError;
use crate::replay::replay_and_verify;
use crate::syslog::{SysLog, Verdict};

/// One ledger plus its audit and commit logs.
pub struct System {
    /// Allocation state
    ledger: Ledger,
    /// Request audit trail
    syslog: SysLog,
    /// Ledger mutations
    commitlog: CommitLog,
    /// Logical clock, advanced once per request
    tick: u64,
}

impl System {
    /// Build the ledger and record the genesis commit.
    ///
    /// An initially unsafe state is accepted and reported, not rejected.
    pub fn initialize(config: LedgerConfig) -> Result<Self, ConfigError> {
        let ledger = Ledger::new(&config)?;

        info!(
            processes = ledger.processes(),
            resources = ledger.resources(),
            "ledger initialized"
        );

        let report = ledger.check_safety();
        if report.is_safe() {
            info!(sequence = %report.sequence(), "initial state is safe");
        } else {
            warn!("initial state is already unsafe");
        }

        Ok(Self {
            ledger,
            syslog: SysLog::new(),
            commitlog: CommitLog::new(config),
            tick: 0,
        })
    }

    /// Read-only view of the current matrices.
    pub fn query_state(&self) -> Snapshot<'_> {
        self.ledger.snapshot()
    }

    /// The ledger itself.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Safety check on the committed state.
    pub fn check_safety(&self) -> SafetyReport {
        self.ledger.check_safety()
    }

    /// Handle one allocation request.
    pub fn request(&mut self, pid: ProcessId, units: &[Units]) -> Outcome {
        self.tick += 1;
        let tick = self.tick;

        debug!(%pid, ?units, tick, "request received");

        // 1. Log request to SysLog
        let req_id = self.syslog.log_request(pid, units, tick);

        // 2. Execute via the pure core
        let result = handle_request(&mut self.ledger, pid, units);

        // 3. Record commits to CommitLog
        for ct in result.commits {
            self.commitlog.append(ct, Some(req_id), tick);
        }

        match &result.outcome {
            Outcome::Granted { sequence } => {
                info!(%pid, ?units, %sequence, "request granted");
            }
            Outcome::Denied(denial @ Denial::Unsafe { .. }) => {
                warn!(%pid, ?units, phase = ?result.phase, "{}; rolled back", denial);
            }
            Outcome::Denied(denial) => {
                debug!(%pid, ?units, phase = ?result.phase, "request denied: {}", denial);
            }
        }

        // 4. Log response to SysLog
        self.syslog
            .log_response(pid, req_id, Verdict::from(&result.outcome), tick);

        result.outcome
    }

    /// Request audit trail.
    pub fn syslog(&self) -> &SysLog {
        &self.syslog
    }

    /// Ledger mutation log.
    pub fn commitlog(&self) -> &CommitLog {
        &self.commitlog
    }

    /// Logical time of the last request.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Replay the commit log and check it reproduces the live ledger.
    pub fn verify_replay(&self) -> Result<(), ReplayError> {
        replay_and_verify(&self.commitlog, &self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::textbook;

    #[test]
    fn test_initialize_records_genesis() {
        let system = System::initialize(textbook()).unwrap();
        assert_eq!(system.commitlog().len(), 1);
        assert_eq!(system.commitlog().genesis(), Some(&textbook()));
        assert!(system.syslog().is_empty());
        assert_eq!(system.tick(), 0);
    }

    #[test]
    fn test_initialize_rejects_bad_config() {
        let config = LedgerConfig::new(vec![], vec![vec![]]);
        assert!(matches!(
            System::initialize(config),
            Err(ConfigError::NoResources)
        ));
    }

    #[test]
    fn test_request_logs_and_commits() {
        let mut system = System::initialize(textbook()).unwrap();

        let outcome = system.request(ProcessId(1), &[1, 0, 2]);
        assert!(outcome.is_granted());

        assert_eq!(system.syslog().len(), 2);
        assert_eq!(system.commitlog().len(), 2);
        assert_eq!(system.commitlog().head().and_then(|c| c.caused_by), Some(0));
        assert_eq!(system.tick(), 1);
    }

    #[test]
    fn test_denied_request_logs_without_commit() {
        let mut system = System::initialize(textbook()).unwrap();

        let outcome = system.request(ProcessId(9), &[0, 0, 0]);
        assert!(!outcome.is_granted());

        assert_eq!(system.syslog().len(), 2);
        assert_eq!(system.syslog().count_verdicts(Verdict::InvalidProcess), 1);
        assert_eq!(system.commitlog().len(), 1);
    }

    #[test]
    fn test_verify_replay_after_requests() {
        let mut system = System::initialize(textbook()).unwrap();
        system.request(ProcessId(1), &[1, 0, 2]);
        system.request(ProcessId(0), &[0, 2, 0]);
        system.request(ProcessId(3), &[0, 1, 0]);

        assert!(system.verify_replay().is_ok());
    }
}
