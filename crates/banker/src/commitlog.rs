//! Commit Log
//!
//! Append-only record of ledger mutations. Entry 0 is always the genesis
//! commit carrying the construction config; every later entry is one granted
//! allocation. Replaying the log onto a fresh ledger reproduces the live one.

use banker_core::{CommitType, LedgerConfig};
use serde::{Deserialize, Serialize};

use crate::syslog::EventId;

/// Sequence number of a commit
pub type CommitId = u64;

/// A commit record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Sequence number (0 = genesis)
    pub seq: CommitId,
    /// Logical time of the mutation
    pub tick: u64,
    /// Request event that caused this commit, if any
    pub caused_by: Option<EventId>,
    /// Type of mutation
    pub commit_type: CommitType,
}

/// Append-only ledger mutation log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitLog {
    commits: Vec<Commit>,
}

impl CommitLog {
    /// Create a log holding only the genesis commit.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            commits: vec![Commit {
                seq: 0,
                tick: 0,
                caused_by: None,
                commit_type: CommitType::Genesis { config },
            }],
        }
    }

    /// Append a commit and return its sequence number.
    pub fn append(
        &mut self,
        commit_type: CommitType,
        caused_by: Option<EventId>,
        tick: u64,
    ) -> CommitId {
        let seq = self.commits.len() as CommitId;
        self.commits.push(Commit {
            seq,
            tick,
            caused_by,
            commit_type,
        });
        seq
    }

    /// All commits, genesis first.
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// The construction config recorded at genesis.
    pub fn genesis(&self) -> Option<&LedgerConfig> {
        match self.commits.first().map(|c| &c.commit_type) {
            Some(CommitType::Genesis { config }) => Some(config),
            _ => None,
        }
    }

    /// The most recent commit.
    pub fn head(&self) -> Option<&Commit> {
        self.commits.last()
    }

    /// Sequence number of the most recent commit.
    pub fn current_seq(&self) -> CommitId {
        self.head().map(|c| c.seq).unwrap_or(0)
    }

    /// Number of commits, genesis included.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Check if the log has no commits at all.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Structural checks: genesis first and only first, contiguous sequence
    /// numbers, non-decreasing ticks.
    pub fn verify_integrity(&self) -> bool {
        if self.genesis().is_none() {
            return false;
        }

        let contiguous = self
            .commits
            .iter()
            .enumerate()
            .all(|(i, c)| c.seq == i as CommitId);
        let single_genesis = self
            .commits
            .iter()
            .skip(1)
            .all(|c| !matches!(c.commit_type, CommitType::Genesis { .. }));
        let ordered = self.commits.windows(2).all(|w| w[0].tick <= w[1].tick);

        contiguous && single_genesis && ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_core::ProcessId;

    fn config() -> LedgerConfig {
        LedgerConfig::new(vec![2], vec![vec![2], vec![1]])
    }

    #[test]
    fn test_new_log_has_genesis() {
        let log = CommitLog::new(config());
        assert_eq!(log.len(), 1);
        assert_eq!(log.current_seq(), 0);
        assert_eq!(log.genesis(), Some(&config()));
        assert!(log.verify_integrity());
    }

    #[test]
    fn test_append_assigns_sequence() {
        let mut log = CommitLog::new(config());

        let seq = log.append(
            CommitType::Allocated {
                pid: ProcessId(0),
                request: vec![1],
            },
            Some(4),
            3,
        );

        assert_eq!(seq, 1);
        assert_eq!(log.current_seq(), 1);
        assert_eq!(log.head().map(|c| c.caused_by), Some(Some(4)));
        assert!(log.verify_integrity());
    }

    #[test]
    fn test_integrity_rejects_second_genesis() {
        let mut log = CommitLog::new(config());
        log.append(CommitType::Genesis { config: config() }, None, 1);
        assert!(!log.verify_integrity());
    }

    #[test]
    fn test_integrity_rejects_time_going_backwards() {
        let mut log = CommitLog::new(config());
        let allocated = CommitType::Allocated {
            pid: ProcessId(1),
            request: vec![1],
        };
        log.append(allocated.clone(), None, 5);
        log.append(allocated, None, 2);
        assert!(!log.verify_integrity());
    }

    #[test]
    fn test_serializes_to_json() {
        let log = CommitLog::new(config());
        let json = serde_json::to_string(&log).unwrap();
        let back: CommitLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.commits(), log.commits());
    }
}
