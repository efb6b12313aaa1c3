//! Ledger error types
//!
//! Two families:
//! - [`ConfigError`]: construction input is malformed; no ledger is produced.
//! - [`Denial`]: a single request was not granted; the ledger is unchanged.

use crate::types::{ProcessId, ResourceId, Units};

/// Construction failures. Fatal at the boundary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Max has no rows
    #[error("process count must be positive")]
    NoProcesses,

    /// Available has no columns
    #[error("resource class count must be positive")]
    NoResources,

    /// More processes than the configured limit
    #[error("process count {count} exceeds limit {limit}")]
    TooManyProcesses { count: usize, limit: usize },

    /// More resource classes than the configured limit
    #[error("resource class count {count} exceeds limit {limit}")]
    TooManyResources { count: usize, limit: usize },

    /// A Max row does not have `m` entries
    #[error("Max row for {pid} has {actual} entries, expected {expected}")]
    RaggedMax {
        pid: ProcessId,
        expected: usize,
        actual: usize,
    },

    /// Allocation has a different number of rows than Max
    #[error("Allocation has {actual} rows, expected {expected}")]
    AllocationRows { expected: usize, actual: usize },

    /// An Allocation row does not have `m` entries
    #[error("Allocation row for {pid} has {actual} entries, expected {expected}")]
    RaggedAllocation {
        pid: ProcessId,
        expected: usize,
        actual: usize,
    },

    /// A process already holds more than it ever declared
    #[error("Allocation[{pid}][{resource}] = {allocation} > Max[{pid}][{resource}] = {max}")]
    AllocationExceedsMax {
        pid: ProcessId,
        resource: ResourceId,
        allocation: Units,
        max: Units,
    },

    /// Total units of a class do not fit the unit type
    #[error("total units of {resource} overflow")]
    Overflow { resource: ResourceId },
}

/// Reasons a request is not granted.
///
/// Every denial leaves the ledger exactly as it was before the request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// Process index outside `[0, n)`
    #[error("invalid process {pid}: ledger has {processes} processes")]
    InvalidProcess { pid: ProcessId, processes: usize },

    /// Request vector length is not `m`
    #[error("request has {actual} entries, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Request exceeds the remaining declared claim of the process
    #[error("Request[{resource}] = {requested} > Need[{pid}][{resource}] = {need}")]
    ExceedsClaim {
        pid: ProcessId,
        resource: ResourceId,
        requested: Units,
        need: Units,
    },

    /// Not enough free units right now
    #[error("Request[{resource}] = {requested} > Available[{resource}] = {available}")]
    InsufficientResources {
        resource: ResourceId,
        requested: Units,
        available: Units,
    },

    /// Granting would leave no guaranteed completion order
    #[error("granting the request to {pid} would leave the system unsafe")]
    Unsafe { pid: ProcessId },
}

impl Denial {
    /// True when the same request may succeed later without the caller
    /// changing it (resources freed or state changed).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Denial::InsufficientResources { .. } | Denial::Unsafe { .. }
        )
    }
}
