//! Runtime error types

use std::path::PathBuf;

use banker_core::{ConfigError, Denial};

use crate::commitlog::CommitId;

/// Errors surfaced by the runtime wrapper.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// Construction input rejected by the core
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Scenario file could not be read
    #[error("failed to read scenario {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scenario file is not valid JSON for a ledger config
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    /// Commit log does not reproduce the live ledger
    #[error("replay failed: {0}")]
    Replay(#[from] ReplayError),
}

/// Errors while replaying a commit log.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// First commit is not a genesis commit
    #[error("commit log has no genesis commit")]
    MissingGenesis,

    /// A genesis commit after position 0
    #[error("unexpected genesis commit at seq {seq}")]
    UnexpectedGenesis { seq: CommitId },

    /// Genesis config no longer builds a ledger
    #[error("genesis config rejected: {0}")]
    Config(#[from] ConfigError),

    /// A recorded allocation is not granted on replay
    #[error("commit {seq} not granted on replay: {denial}")]
    Rejected {
        seq: CommitId,
        #[source]
        denial: Denial,
    },

    /// An invariant failed after applying a commit
    #[error("invariant {invariant} violated after commit {seq}: {description}")]
    InvariantViolated {
        seq: CommitId,
        invariant: &'static str,
        description: String,
    },

    /// Replayed ledger differs from the live one
    #[error("replayed ledger diverges from live state")]
    Diverged,
}
