//! Banker Runtime
//!
//! This crate wraps the pure `banker-core` state machine:
//! - `System`: the single coordinator owning one ledger
//! - SysLog audit trail of every request and verdict
//! - CommitLog of every ledger mutation, with deterministic replay
//! - JSON scenario loading
//! - Structured logging via `tracing`

pub mod commitlog;
pub mod error;
pub mod replay;
pub mod scenario;
pub mod syslog;
pub mod system;

pub use banker_core::*;

pub use commitlog::{Commit, CommitId, CommitLog};
pub use error::{ReplayError, SystemError};
pub use replay::{replay, replay_and_verify};
pub use syslog::{EventId, SysEvent, SysEventType, SysLog, Verdict};
pub use system::System;
