//! Resource ledger - pure data structure holding all allocation state
//!
//! This module contains the [`Ledger`], which owns the Available vector and the
//! Max, Allocation and Need matrices for `n` processes and `m` resource
//! classes. It has NO I/O - request handling lives in [`crate::request`] and
//! safety decisions in [`crate::safety`].

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::config::LedgerConfig;
use crate::error::ConfigError;
use crate::safety::{is_safe, SafetyReport};
use crate::types::{ProcessId, Units};

/// The allocation ledger.
///
/// Need is kept current by [`Ledger::apply_delta`] and [`Ledger::undo_delta`];
/// [`Ledger::derive_need`] re-syncs it from Max and Allocation in bulk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    /// Free units per class
    pub(crate) available: Vec<Units>,
    /// Maximum claim per process (fixed after construction)
    pub(crate) max: Vec<Vec<Units>>,
    /// Units held per process
    pub(crate) allocation: Vec<Vec<Units>>,
    /// Remaining claim per process (`max - allocation`)
    pub(crate) need: Vec<Vec<Units>>,
    /// Units per class in existence, fixed at construction
    pub(crate) totals: Vec<Units>,
}

impl Ledger {
    /// Build a ledger from validated construction input.
    pub fn new(config: &LedgerConfig) -> Result<Self, ConfigError> {
        let totals = config.validate()?;
        let n = config.processes();
        let m = config.resources();

        let mut ledger = Self {
            available: config.available.clone(),
            max: config.max.clone(),
            allocation: config.allocation_or_zero(),
            need: vec![vec![0; m]; n],
            totals,
        };
        ledger.derive_need();
        Ok(ledger)
    }

    /// Number of processes (`n`)
    pub fn processes(&self) -> usize {
        self.max.len()
    }

    /// Number of resource classes (`m`)
    pub fn resources(&self) -> usize {
        self.available.len()
    }

    /// Check if a process index is inside `[0, n)`
    pub fn contains(&self, pid: ProcessId) -> bool {
        pid.0 < self.processes()
    }

    /// Free units per class
    pub fn available(&self) -> &[Units] {
        &self.available
    }

    /// Units per class in existence
    pub fn totals(&self) -> &[Units] {
        &self.totals
    }

    /// Max row of a process
    pub fn max(&self, pid: ProcessId) -> Option<&[Units]> {
        self.max.get(pid.0).map(Vec::as_slice)
    }

    /// Allocation row of a process
    pub fn allocation(&self, pid: ProcessId) -> Option<&[Units]> {
        self.allocation.get(pid.0).map(Vec::as_slice)
    }

    /// Need row of a process
    pub fn need(&self, pid: ProcessId) -> Option<&[Units]> {
        self.need.get(pid.0).map(Vec::as_slice)
    }

    /// Recompute Need from Max and Allocation for every row.
    pub fn derive_need(&mut self) {
        for ((need_row, max_row), alloc_row) in
            self.need.iter_mut().zip(&self.max).zip(&self.allocation)
        {
            for ((need, &max), &held) in need_row.iter_mut().zip(max_row).zip(alloc_row) {
                *need = max.saturating_sub(held);
            }
        }
    }

    /// Move `request` from Available into the process's Allocation.
    ///
    /// The caller must already have checked `request <= Need[pid]` and
    /// `request <= Available`.
    pub fn apply_delta(&mut self, pid: ProcessId, request: &[Units]) {
        let p = pid.0;
        for (j, &units) in request.iter().enumerate() {
            self.available[j] -= units;
            self.allocation[p][j] += units;
            self.need[p][j] -= units;
        }
    }

    /// Exact inverse of [`Ledger::apply_delta`] for the same `request`.
    pub fn undo_delta(&mut self, pid: ProcessId, request: &[Units]) {
        let p = pid.0;
        for (j, &units) in request.iter().enumerate() {
            self.available[j] += units;
            self.allocation[p][j] -= units;
            self.need[p][j] += units;
        }
    }

    /// Read-only view of the four matrices.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            available: &self.available,
            max: &self.max,
            allocation: &self.allocation,
            need: &self.need,
        }
    }

    /// Run the safety check on the committed state.
    pub fn check_safety(&self) -> SafetyReport {
        is_safe(&self.snapshot())
    }
}

/// Borrowed view of ledger state, for display and for the safety check.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    /// Free units per class
    pub available: &'a [Units],
    /// Maximum claim per process
    pub max: &'a [Vec<Units>],
    /// Units held per process
    pub allocation: &'a [Vec<Units>],
    /// Remaining claim per process
    pub need: &'a [Vec<Units>],
}

impl Snapshot<'_> {
    /// Number of processes (`n`)
    pub fn processes(&self) -> usize {
        self.max.len()
    }

    /// Number of resource classes (`m`)
    pub fn resources(&self) -> usize {
        self.available.len()
    }
}

fn write_matrix(f: &mut fmt::Formatter<'_>, title: &str, rows: &[Vec<Units>]) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}:", title)?;
    for (i, row) in rows.iter().enumerate() {
        write!(f, "{}: ", ProcessId(i))?;
        for units in row {
            write!(f, "{:3} ", units)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// State table in the classic simulator layout.
impl fmt::Display for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== System State ==========")?;
        writeln!(
            f,
            "processes n = {}, resource classes m = {}",
            self.processes(),
            self.resources()
        )?;

        writeln!(f)?;
        writeln!(f, "Available:")?;
        for (j, units) in self.available.iter().enumerate() {
            write!(f, "R{}:{}  ", j, units)?;
        }
        writeln!(f)?;

        write_matrix(f, "Max", self.max)?;
        write_matrix(f, "Allocation", self.allocation)?;
        write_matrix(f, "Need", self.need)?;

        writeln!(f, "==================================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn small() -> Ledger {
        let config = LedgerConfig::new(vec![3, 2], vec![vec![4, 2], vec![1, 3]])
            .with_allocation(vec![vec![1, 0], vec![0, 1]]);
        Ledger::new(&config).unwrap()
    }

    #[test]
    fn test_new_derives_need() {
        let ledger = small();
        assert_eq!(ledger.processes(), 2);
        assert_eq!(ledger.resources(), 2);
        assert_eq!(ledger.need(ProcessId(0)), Some(&[3, 2][..]));
        assert_eq!(ledger.need(ProcessId(1)), Some(&[1, 2][..]));
        assert_eq!(ledger.totals(), &[4, 3]);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = LedgerConfig::new(vec![1], vec![vec![1]]).with_allocation(vec![vec![2]]);
        assert!(matches!(
            Ledger::new(&config),
            Err(ConfigError::AllocationExceedsMax { .. })
        ));
    }

    #[test]
    fn test_row_accessors_out_of_range() {
        let ledger = small();
        assert!(ledger.contains(ProcessId(1)));
        assert!(!ledger.contains(ProcessId(2)));
        assert_eq!(ledger.max(ProcessId(2)), None);
        assert_eq!(ledger.allocation(ProcessId(2)), None);
        assert_eq!(ledger.need(ProcessId(2)), None);
    }

    #[test]
    fn test_apply_delta_moves_units() {
        let mut ledger = small();
        ledger.apply_delta(ProcessId(0), &[2, 1]);

        assert_eq!(ledger.available(), &[1, 1]);
        assert_eq!(ledger.allocation(ProcessId(0)), Some(&[3, 1][..]));
        assert_eq!(ledger.need(ProcessId(0)), Some(&[1, 1][..]));
        // Other rows untouched
        assert_eq!(ledger.allocation(ProcessId(1)), Some(&[0, 1][..]));
    }

    #[test]
    fn test_undo_delta_restores_exactly() {
        let mut ledger = small();
        let before = ledger.clone();

        ledger.apply_delta(ProcessId(1), &[1, 2]);
        assert_ne!(ledger, before);

        ledger.undo_delta(ProcessId(1), &[1, 2]);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_derive_need_resyncs_after_bulk_load() {
        let mut ledger = small();
        ledger.allocation[0] = vec![4, 2];
        ledger.derive_need();
        assert_eq!(ledger.need(ProcessId(0)), Some(&[0, 0][..]));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let ledger = small();
        let snap = ledger.snapshot();
        assert_eq!(snap.processes(), 2);
        assert_eq!(snap.resources(), 2);
        assert_eq!(snap.available, &[3, 2]);
        assert_eq!(snap.need[1], vec![1, 2]);
    }

    #[test]
    fn test_snapshot_display() {
        let ledger = small();
        let text = ledger.snapshot().to_string();

        assert!(text.contains("processes n = 2, resource classes m = 2"));
        assert!(text.contains("R0:3  R1:2"));
        assert!(text.contains("Allocation:\nP0:   1   0 \nP1:   0   1 \n"));
        assert!(text.contains("Need:\nP0:   3   2 \nP1:   1   2 \n"));
    }
}
