//! Core ledger types
//!
//! This module contains the fundamental types used throughout the banker core.
//! All types here are pure data - no behavior that depends on I/O.

use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Units of a single resource class.
///
/// Quantities are unsigned: a ledger is only ever built from input where
/// `Allocation <= Max`, so neither Allocation nor Need can go negative.
pub type Units = u32;

/// Default upper bound on the number of processes
pub const DEFAULT_MAX_PROCESSES: usize = 10;

/// Default upper bound on the number of resource classes
pub const DEFAULT_MAX_RESOURCES: usize = 10;

/// Process identifier (dense row index into the ledger matrices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Row index of this process
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Resource class identifier (dense column index into the ledger matrices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub usize);

impl ResourceId {
    /// Column index of this resource class
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Construction bounds on ledger dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Largest accepted process count
    pub max_processes: usize,
    /// Largest accepted resource class count
    pub max_resources: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_processes: DEFAULT_MAX_PROCESSES,
            max_resources: DEFAULT_MAX_RESOURCES,
        }
    }
}

/// An order in which processes are proven able to run to completion.
///
/// Only meaningful when produced by a safety check that reported `safe`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeSequence(Vec<ProcessId>);

impl SafeSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty sequence with room for `n` processes
    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    /// Append a process that was just marked finishable
    pub fn push(&mut self, pid: ProcessId) {
        self.0.push(pid);
    }

    /// Processes in completion order
    pub fn as_slice(&self) -> &[ProcessId] {
        &self.0
    }

    /// Row indices in completion order
    pub fn indices(&self) -> Vec<usize> {
        self.0.iter().map(|p| p.0).collect()
    }

    /// Number of processes in the sequence
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate processes in completion order
    pub fn iter(&self) -> core::slice::Iter<'_, ProcessId> {
        self.0.iter()
    }
}

impl From<Vec<ProcessId>> for SafeSequence {
    fn from(pids: Vec<ProcessId>) -> Self {
        Self(pids)
    }
}

impl<'a> IntoIterator for &'a SafeSequence {
    type Item = &'a ProcessId;
    type IntoIter = core::slice::Iter<'a, ProcessId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Renders as `P1 -> P3 -> P4 -> P0 -> P2`
impl fmt::Display for SafeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, pid) in self.0.iter().enumerate() {
            if k > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", pid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_process_id_display() {
        assert_eq!(ProcessId(3).to_string(), "P3");
        assert_eq!(ResourceId(0).to_string(), "R0");
    }

    #[test]
    fn test_safe_sequence_display() {
        let seq = SafeSequence::from(vec![ProcessId(1), ProcessId(3), ProcessId(4)]);
        assert_eq!(seq.to_string(), "P1 -> P3 -> P4");
        assert_eq!(seq.indices(), vec![1, 3, 4]);
    }

    #[test]
    fn test_empty_sequence_display() {
        assert_eq!(SafeSequence::new().to_string(), "");
        assert!(SafeSequence::with_capacity(4).is_empty());
    }

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_processes, DEFAULT_MAX_PROCESSES);
        assert_eq!(limits.max_resources, DEFAULT_MAX_RESOURCES);
    }
}
