//! Formal invariants for ledger verification
//!
//! This module contains runtime-checkable invariants that should always hold
//! before and after every completed operation. They are used for:
//! 1. Runtime assertion checking during development and replay
//! 2. Property-based testing with proptest
//! 3. Formal verification with Kani
//!
//! # Invariants
//!
//! 0. **Dimension Consistency**: every matrix is `n x m`, every vector `m`
//! 1. **Non-negativity**: Allocation and Need are never negative. Units are
//!    unsigned, so this is enforced by the type; underflow would panic in
//!    debug builds before it could be observed.
//! 2. **Allocation Within Max**: `Allocation[i][j] <= Max[i][j]`
//! 3. **Conservation**: `Available[j] + sum_i Allocation[i][j] == total[j]`
//! 4. **Need Consistency**: `Need[i][j] == Max[i][j] - Allocation[i][j]`

use alloc::string::String;
use alloc::vec::Vec;

use crate::ledger::Ledger;
use crate::types::{ProcessId, ResourceId, Units};

/// An invariant violation with details
#[derive(Clone, Debug)]
pub struct InvariantViolation {
    /// Name of the violated invariant
    pub invariant: &'static str,
    /// Description of what went wrong
    pub description: String,
}

/// Check all ledger invariants.
///
/// Returns a list of violations (empty if all invariants hold).
pub fn check_all_invariants(ledger: &Ledger) -> Vec<InvariantViolation> {
    let violations = check_dimension_consistency(ledger);
    if !violations.is_empty() {
        // The remaining checks index by (i, j)
        return violations;
    }

    let mut violations = Vec::new();
    violations.extend(check_allocation_within_max(ledger));
    violations.extend(check_conservation(ledger));
    violations.extend(check_need_consistency(ledger));
    violations
}

/// Invariant 0: all matrices agree on `n` and `m`
fn check_dimension_consistency(ledger: &Ledger) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let n = ledger.max.len();
    let m = ledger.available.len();

    if ledger.totals.len() != m {
        violations.push(InvariantViolation {
            invariant: "dimension_consistency",
            description: alloc::format!(
                "totals has {} entries, expected {}",
                ledger.totals.len(),
                m
            ),
        });
    }

    for (name, matrix) in [
        ("Max", &ledger.max),
        ("Allocation", &ledger.allocation),
        ("Need", &ledger.need),
    ] {
        if matrix.len() != n {
            violations.push(InvariantViolation {
                invariant: "dimension_consistency",
                description: alloc::format!("{} has {} rows, expected {}", name, matrix.len(), n),
            });
            continue;
        }
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != m {
                violations.push(InvariantViolation {
                    invariant: "dimension_consistency",
                    description: alloc::format!(
                        "{} row {} has {} entries, expected {}",
                        name,
                        ProcessId(i),
                        row.len(),
                        m
                    ),
                });
            }
        }
    }

    violations
}

/// Invariant 2: no process holds more than it declared
fn check_allocation_within_max(ledger: &Ledger) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (i, (alloc_row, max_row)) in ledger.allocation.iter().zip(&ledger.max).enumerate() {
        for (j, (&held, &max)) in alloc_row.iter().zip(max_row).enumerate() {
            if held > max {
                violations.push(InvariantViolation {
                    invariant: "allocation_within_max",
                    description: alloc::format!(
                        "Allocation[{}][{}] = {} exceeds Max = {}",
                        ProcessId(i),
                        ResourceId(j),
                        held,
                        max
                    ),
                });
            }
        }
    }

    violations
}

/// Invariant 3: units are neither created nor destroyed
fn check_conservation(ledger: &Ledger) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (j, (&available, &total)) in ledger.available.iter().zip(&ledger.totals).enumerate() {
        let held: u64 = ledger
            .allocation
            .iter()
            .map(|row| u64::from(row[j]))
            .sum();
        let observed = u64::from(available) + held;

        if observed != u64::from(total) {
            violations.push(InvariantViolation {
                invariant: "conservation",
                description: alloc::format!(
                    "{}: available {} + allocated {} != total {}",
                    ResourceId(j),
                    available,
                    held,
                    total
                ),
            });
        }
    }

    violations
}

/// Invariant 4: Need is exactly Max - Allocation
fn check_need_consistency(ledger: &Ledger) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (i, ((need_row, max_row), alloc_row)) in ledger
        .need
        .iter()
        .zip(&ledger.max)
        .zip(&ledger.allocation)
        .enumerate()
    {
        for (j, ((&need, &max), &held)) in need_row.iter().zip(max_row).zip(alloc_row).enumerate()
        {
            let expected: Option<Units> = max.checked_sub(held);
            if expected != Some(need) {
                violations.push(InvariantViolation {
                    invariant: "need_consistency",
                    description: alloc::format!(
                        "Need[{}][{}] = {} but Max - Allocation = {} - {}",
                        ProcessId(i),
                        ResourceId(j),
                        need,
                        max,
                        held
                    ),
                });
            }
        }
    }

    violations
}

/// Assert all invariants hold (panic if not)
pub fn assert_invariants(ledger: &Ledger) {
    let violations = check_all_invariants(ledger);
    if let Some(v) = violations.first() {
        panic!("Invariant violated: {} ({})", v.invariant, v.description);
    }
}

// ============================================================================
// Kani proofs for invariants
// ============================================================================

#[cfg(kani)]
mod proofs {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::request::handle_request;
    use alloc::vec;

    /// Proof: any single-class request on a two-process ledger keeps invariants
    #[kani::proof]
    #[kani::unwind(5)]
    fn request_maintains_invariants() {
        let available: Units = kani::any();
        let max0: Units = kani::any();
        let max1: Units = kani::any();
        let held0: Units = kani::any();
        let held1: Units = kani::any();
        kani::assume(available <= 8 && max0 <= 8 && max1 <= 8);
        kani::assume(held0 <= max0 && held1 <= max1);

        let config = LedgerConfig::new(vec![available], vec![vec![max0], vec![max1]])
            .with_allocation(vec![vec![held0], vec![held1]]);
        let Ok(mut ledger) = crate::ledger::Ledger::new(&config) else {
            return;
        };

        let pid: usize = kani::any();
        let units: Units = kani::any();
        kani::assume(pid <= 2 && units <= 8);

        let _ = handle_request(&mut ledger, ProcessId(pid), &[units]);

        kani::assert(
            check_all_invariants(&ledger).is_empty(),
            "Handling a request should maintain invariants",
        );
    }
}
