//! Roll-up of child values into parent totals and the ledger grand total.

use crate::domain::entities::{Category, Entry, Ledger};

/// Set a parent's value to the sum of its children and recompute its variance.
pub(crate) fn aggregate_parent(entry: &mut Entry, children: &[Entry]) {
    entry.set_value(sum_values(children.iter()));
}

/// Sum of all root values, computed fresh on every call.
pub fn grand_total(ledger: &Ledger) -> f64 {
    sum_values(ledger.categories().iter().map(Category::entry))
}

fn sum_values<'a>(entries: impl Iterator<Item = &'a Entry>) -> f64 {
    entries.fold(0.0, |total, entry| total + entry.value())
}

impl Ledger {
    /// See [`grand_total`].
    pub fn grand_total(&self) -> f64 {
        grand_total(self)
    }
}
