//! Ledger state service
//!
//! Holds the current ledger snapshot and serializes allocations against it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument};

use crate::domain::{Adjustment, Allocation, Ledger};

/// Owner of the current ledger snapshot.
///
/// Each operation runs under one lock: the target update and the parent
/// roll-up are computed on a copy and swapped in whole.
#[derive(Debug)]
pub struct LedgerService {
    state: Mutex<Ledger>,
}

impl LedgerService {
    /// Create a new ledger service around an initial ledger.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            state: Mutex::new(ledger),
        }
    }

    // Snapshots are replaced by a single assignment, so a poisoned lock still
    // guards a consistent ledger.
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot.
    pub fn tree(&self) -> Ledger {
        self.lock().clone()
    }

    /// Apply an adjustment to the entry with `row_id` and store the result.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&self, row_id: &str, adjustment: Adjustment) -> Allocation {
        let mut current = self.lock();
        let allocation = current.apply(row_id, adjustment);
        match allocation.target {
            Some(target) => {
                debug!(?target, "allocation applied");
                *current = allocation.ledger.clone();
            }
            None => debug!("unknown row id, ledger unchanged"),
        }
        allocation
    }

    pub fn apply_percentage(&self, row_id: &str, percentage: f64) -> Ledger {
        self.apply(row_id, Adjustment::Percentage(percentage)).ledger
    }

    pub fn apply_value(&self, row_id: &str, new_value: f64) -> Ledger {
        self.apply(row_id, Adjustment::Value(new_value)).ledger
    }

    /// Sum of root values of the current snapshot.
    pub fn grand_total(&self) -> f64 {
        self.lock().grand_total()
    }
}
