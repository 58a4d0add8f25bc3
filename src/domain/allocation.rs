//! Allocation engine: percentage and absolute adjustments with parent roll-up.

use std::fmt;

use tracing::{debug, instrument, trace};

use crate::domain::aggregate::aggregate_parent;
use crate::domain::entities::{Category, Ledger};

/// How an allocation changes the target's current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Relative change: `value + value * pct / 100`.
    Percentage(f64),
    /// Absolute override.
    Value(f64),
}

impl Adjustment {
    /// New value for a node currently at `current`.
    pub fn resolve(self, current: f64) -> f64 {
        match self {
            Adjustment::Percentage(percentage) => current + (current * percentage) / 100.0,
            Adjustment::Value(value) => value,
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::Percentage(percentage) => write!(f, "{percentage:+}%"),
            Adjustment::Value(value) => write!(f, "={value}"),
        }
    }
}

/// Allocation operation selected by a caller before the amount is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    Percentage,
    Value,
}

impl AllocationKind {
    pub fn with_amount(self, amount: f64) -> Adjustment {
        match self {
            AllocationKind::Percentage => Adjustment::Percentage(amount),
            AllocationKind::Value => Adjustment::Value(amount),
        }
    }
}

/// Position of a ledger entry addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationTarget {
    /// Root category at `index`.
    Root { index: usize },
    /// Child `index` of the root category at `root`.
    Child { root: usize, index: usize },
}

/// Result of an allocation: the new snapshot and the entry it touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub ledger: Ledger,
    /// `None` when no entry matched; `ledger` is then an unchanged copy.
    pub target: Option<AllocationTarget>,
}

impl Allocation {
    pub fn is_applied(&self) -> bool {
        self.target.is_some()
    }
}

impl Ledger {
    /// Locate an entry by id. Roots are checked before their children.
    pub fn locate(&self, row_id: &str) -> Option<AllocationTarget> {
        self.categories()
            .iter()
            .enumerate()
            .find_map(|(root, category)| {
                if category.id() == row_id {
                    return Some(AllocationTarget::Root { index: root });
                }
                category
                    .children()?
                    .iter()
                    .position(|child| child.id() == row_id)
                    .map(|index| AllocationTarget::Child { root, index })
            })
    }

    /// Apply `adjustment` to the entry with `row_id`, returning a new snapshot.
    ///
    /// A child edit re-aggregates its owning parent. A root edit overwrites the
    /// root's own value and leaves its children as they are, so the parent
    /// total and its children disagree until the next child edit. An unknown
    /// id returns an unchanged copy.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&self, row_id: &str, adjustment: Adjustment) -> Allocation {
        let Some(target) = self.locate(row_id) else {
            debug!("no entry with this id, ledger unchanged");
            return Allocation {
                ledger: self.clone(),
                target: None,
            };
        };

        let mut ledger = self.clone();
        match target {
            AllocationTarget::Root { index } => {
                if let Some(category) = ledger.categories_mut().get_mut(index) {
                    let entry = category.entry_mut();
                    entry.set_value(adjustment.resolve(entry.value()));
                    trace!(value = entry.value(), variance = entry.variance(), "root updated");
                }
            }
            AllocationTarget::Child { root, index } => {
                if let Some(Category::Parent { entry, children }) =
                    ledger.categories_mut().get_mut(root)
                {
                    if let Some(child) = children.get_mut(index) {
                        child.set_value(adjustment.resolve(child.value()));
                        trace!(value = child.value(), variance = child.variance(), "child updated");
                    }
                    aggregate_parent(entry, children);
                    trace!(value = entry.value(), variance = entry.variance(), "parent re-aggregated");
                }
            }
        }

        Allocation {
            ledger,
            target: Some(target),
        }
    }

    /// Grow or shrink the entry with `row_id` by `percentage` percent.
    pub fn apply_percentage(&self, row_id: &str, percentage: f64) -> Ledger {
        self.apply(row_id, Adjustment::Percentage(percentage)).ledger
    }

    /// Set the entry with `row_id` to `new_value`.
    pub fn apply_value(&self, row_id: &str, new_value: f64) -> Ledger {
        self.apply(row_id, Adjustment::Value(new_value)).ledger
    }
}
