//! Construction input for a ledger
//!
//! `n` is the number of Max rows and `m` the length of Available; every other
//! matrix must agree with those. Validation lives in [`LedgerConfig::validate`]
//! so a ledger is never built from inconsistent input.

use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Limits, ProcessId, ResourceId, Units};

/// Initial ledger contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Free units per resource class
    pub available: Vec<Units>,
    /// Declared maximum claim, one row per process
    pub max: Vec<Vec<Units>>,
    /// Units already held; all zero when absent
    #[serde(default)]
    pub allocation: Option<Vec<Vec<Units>>>,
    /// Dimension bounds
    #[serde(default)]
    pub limits: Limits,
}

impl LedgerConfig {
    /// Config with nothing allocated yet.
    pub fn new(available: Vec<Units>, max: Vec<Vec<Units>>) -> Self {
        Self {
            available,
            max,
            allocation: None,
            limits: Limits::default(),
        }
    }

    /// Set the pre-existing allocation.
    pub fn with_allocation(mut self, allocation: Vec<Vec<Units>>) -> Self {
        self.allocation = Some(allocation);
        self
    }

    /// Override dimension bounds.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of processes
    pub fn processes(&self) -> usize {
        self.max.len()
    }

    /// Number of resource classes
    pub fn resources(&self) -> usize {
        self.available.len()
    }

    /// Allocation matrix, materializing zeros if none was supplied.
    pub fn allocation_or_zero(&self) -> Vec<Vec<Units>> {
        match &self.allocation {
            Some(rows) => rows.clone(),
            None => vec![vec![0; self.resources()]; self.processes()],
        }
    }

    /// Check dimensions, limits, `Allocation <= Max` and that class totals
    /// fit the unit type. Returns the per-class totals.
    pub fn validate(&self) -> Result<Vec<Units>, ConfigError> {
        let n = self.processes();
        let m = self.resources();

        if n == 0 {
            return Err(ConfigError::NoProcesses);
        }
        if m == 0 {
            return Err(ConfigError::NoResources);
        }
        if n > self.limits.max_processes {
            return Err(ConfigError::TooManyProcesses {
                count: n,
                limit: self.limits.max_processes,
            });
        }
        if m > self.limits.max_resources {
            return Err(ConfigError::TooManyResources {
                count: m,
                limit: self.limits.max_resources,
            });
        }

        for (i, row) in self.max.iter().enumerate() {
            if row.len() != m {
                return Err(ConfigError::RaggedMax {
                    pid: ProcessId(i),
                    expected: m,
                    actual: row.len(),
                });
            }
        }

        let mut totals = self.available.clone();

        if let Some(allocation) = &self.allocation {
            if allocation.len() != n {
                return Err(ConfigError::AllocationRows {
                    expected: n,
                    actual: allocation.len(),
                });
            }

            for (i, (alloc_row, max_row)) in allocation.iter().zip(&self.max).enumerate() {
                if alloc_row.len() != m {
                    return Err(ConfigError::RaggedAllocation {
                        pid: ProcessId(i),
                        expected: m,
                        actual: alloc_row.len(),
                    });
                }

                for (j, (&held, &max)) in alloc_row.iter().zip(max_row).enumerate() {
                    if held > max {
                        return Err(ConfigError::AllocationExceedsMax {
                            pid: ProcessId(i),
                            resource: ResourceId(j),
                            allocation: held,
                            max,
                        });
                    }
                    totals[j] = totals[j]
                        .checked_add(held)
                        .ok_or(ConfigError::Overflow {
                            resource: ResourceId(j),
                        })?;
                }
            }
        }

        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> LedgerConfig {
        LedgerConfig::new(
            vec![3, 3, 2],
            vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
        )
        .with_allocation(vec![
            vec![0, 1, 0],
            vec![2, 0, 0],
            vec![3, 0, 2],
            vec![2, 1, 1],
            vec![0, 0, 2],
        ])
    }

    #[test]
    fn test_validate_textbook_totals() {
        assert_eq!(textbook().validate(), Ok(vec![10, 5, 7]));
    }

    #[test]
    fn test_validate_without_allocation() {
        let config = LedgerConfig::new(vec![1, 2], vec![vec![1, 1], vec![0, 2]]);
        assert_eq!(config.validate(), Ok(vec![1, 2]));
        assert_eq!(config.allocation_or_zero(), vec![vec![0, 0], vec![0, 0]]);
    }

    #[test]
    fn test_validate_rejects_empty_dimensions() {
        let no_procs = LedgerConfig::new(vec![1], vec![]);
        assert_eq!(no_procs.validate(), Err(ConfigError::NoProcesses));

        let no_res = LedgerConfig::new(vec![], vec![vec![]]);
        assert_eq!(no_res.validate(), Err(ConfigError::NoResources));
    }

    #[test]
    fn test_validate_enforces_limits() {
        let config = textbook().with_limits(Limits {
            max_processes: 4,
            max_resources: 10,
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyProcesses { count: 5, limit: 4 })
        );

        let config = textbook().with_limits(Limits {
            max_processes: 10,
            max_resources: 2,
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyResources { count: 3, limit: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_ragged_rows() {
        let config = LedgerConfig::new(vec![1, 1], vec![vec![1, 1], vec![1]]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::RaggedMax {
                pid: ProcessId(1),
                expected: 2,
                actual: 1
            })
        );

        let config = LedgerConfig::new(vec![1, 1], vec![vec![1, 1]])
            .with_allocation(vec![vec![1, 1], vec![0, 0]]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::AllocationRows {
                expected: 1,
                actual: 2
            })
        );

        let config =
            LedgerConfig::new(vec![1, 1], vec![vec![1, 1]]).with_allocation(vec![vec![1]]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RaggedAllocation { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_allocation_over_max() {
        let config = LedgerConfig::new(vec![0], vec![vec![2]]).with_allocation(vec![vec![3]]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::AllocationExceedsMax {
                pid: ProcessId(0),
                resource: ResourceId(0),
                allocation: 3,
                max: 2
            })
        );
    }

    #[test]
    fn test_validate_detects_total_overflow() {
        let config = LedgerConfig::new(vec![Units::MAX], vec![vec![1]])
            .with_allocation(vec![vec![1]]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Overflow {
                resource: ResourceId(0)
            })
        );
    }
}
