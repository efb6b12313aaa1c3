//! Banker Core - Pure Resource-Allocation State Machine
//!
//! This crate contains the **pure, I/O-free** deadlock-avoidance core: a
//! resource ledger, the safety check over it, and the request processor that
//! grants or denies allocation requests.
//!
//! # Design Principles
//!
//! 1. **No I/O or logging**: all of that lives in the `banker` runtime crate
//! 2. **Pure state transformations**: the ledger is an owned value passed by
//!    reference; there is no global state
//! 3. **Deterministic**: same ledger + request always produces the same outcome
//! 4. **Verifiable**: small enough for Kani proofs and property tests
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       banker-core                           │
//! │                                                             │
//! │   ┌───────────────┐    ┌──────────────────┐                 │
//! │   │    Ledger     │    │ handle_request() │                 │
//! │   │  - available  │───▶│ validate, apply, │                 │
//! │   │  - max        │    │ check, commit or │                 │
//! │   │  - allocation │    │ roll back        │                 │
//! │   │  - need       │    └────────┬─────────┘                 │
//! │   └───────────────┘             │                           │
//! │                                 ▼                           │
//! │   ┌───────────────┐    ┌──────────────────┐                 │
//! │   │  Invariants   │    │    is_safe()     │                 │
//! │   │  Assertions   │    │  pure search on  │                 │
//! │   └───────────────┘    │  a snapshot      │                 │
//! │                        └──────────────────┘                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              │ used by
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         banker                              │
//! │                   (Runtime Wrapper)                         │
//! │   - tracing, SysLog audit trail, CommitLog + replay         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - `types` - Ids, units, limits, safe sequences
//! - `config` - Construction input and its validation
//! - `error` - `ConfigError` and request `Denial`s
//! - `ledger` - The `Ledger` and its read-only `Snapshot`
//! - `safety` - The safety check
//! - `request` - `handle_request(ledger, pid, request) -> StepResult`
//! - `invariants` - Invariant assertions for verification

#![no_std]
extern crate alloc;

pub mod config;
pub mod error;
pub mod invariants;
pub mod ledger;
pub mod request;
pub mod safety;
pub mod types;

// Re-export all public types for convenient access
pub use config::LedgerConfig;
pub use error::{ConfigError, Denial};
pub use invariants::{assert_invariants, check_all_invariants, InvariantViolation};
pub use ledger::{Ledger, Snapshot};
pub use request::{handle_request, validate, CommitType, Outcome, RequestPhase, StepResult};
pub use safety::{is_safe, verify_sequence, SafetyReport};
pub use types::{
    Limits, ProcessId, ResourceId, SafeSequence, Units, DEFAULT_MAX_PROCESSES,
    DEFAULT_MAX_RESOURCES,
};
