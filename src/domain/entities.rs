//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

use crate::domain::variance::variance;

/// One ledger line: a root category or a sub-category.
///
/// `original_value` is fixed at creation. `value` and `variance` only change
/// through [`Entry::set_value`], which keeps them in step.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    id: String,
    label: String,
    original_value: f64,
    value: f64,
    variance: f64,
}

impl Entry {
    /// New entry whose current value equals its baseline.
    pub(crate) fn seed(id: impl Into<String>, label: impl Into<String>, original_value: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            original_value,
            value: original_value,
            variance: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Baseline the variance is measured against.
    pub fn original_value(&self) -> f64 {
        self.original_value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Percentage deviation of `value` from `original_value`.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Replace the current value and recompute variance against the baseline.
    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
        self.variance = variance(self.original_value, value);
    }
}

/// A root ledger entry.
///
/// Children are plain [`Entry`] values, so a sub-category can never own
/// sub-categories of its own. A `Parent` with an empty child list is still a
/// parent; only `Leaf` means "no children".
#[derive(Debug, Clone, PartialEq)]
pub enum Category {
    Leaf(Entry),
    Parent { entry: Entry, children: Vec<Entry> },
}

impl Category {
    pub fn entry(&self) -> &Entry {
        match self {
            Category::Leaf(entry) | Category::Parent { entry, .. } => entry,
        }
    }

    pub(crate) fn entry_mut(&mut self) -> &mut Entry {
        match self {
            Category::Leaf(entry) | Category::Parent { entry, .. } => entry,
        }
    }

    /// Child entries, `None` for a leaf root.
    pub fn children(&self) -> Option<&[Entry]> {
        match self {
            Category::Leaf(_) => None,
            Category::Parent { children, .. } => Some(children),
        }
    }

    pub fn id(&self) -> &str {
        self.entry().id()
    }

    pub fn value(&self) -> f64 {
        self.entry().value()
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, Category::Parent { .. })
    }
}

/// Ordered sequence of root categories.
///
/// Construct with [`Ledger::from_config`]; mutate only through the allocation
/// operations, each of which returns a new snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    categories: Vec<Category>,
}

impl Ledger {
    pub(crate) fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub(crate) fn categories_mut(&mut self) -> &mut [Category] {
        &mut self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// All entries in display order: each root followed by its children.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.categories.iter().flat_map(|category| {
            std::iter::once(category.entry()).chain(category.children().unwrap_or(&[]).iter())
        })
    }

    /// Find an entry by id, root or child.
    pub fn find(&self, id: &str) -> Option<&Entry> {
        self.entries().find(|entry| entry.id() == id)
    }
}

/// Initial configuration of a sub-category.
///
/// Unknown keys are rejected, so a nested `children` table is a parse error
/// rather than a silently ignored third level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryConfig {
    pub id: String,
    pub label: String,
    pub original_value: f64,
}

impl EntryConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>, original_value: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            original_value,
        }
    }
}

/// Initial configuration of a root category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub id: String,
    pub label: String,
    pub original_value: f64,
    /// `None` makes a leaf root; `Some(vec![])` a parent without children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<EntryConfig>>,
}

impl CategoryConfig {
    pub fn leaf(id: impl Into<String>, label: impl Into<String>, original_value: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            original_value,
            children: None,
        }
    }

    pub fn parent(
        id: impl Into<String>,
        label: impl Into<String>,
        original_value: f64,
        children: Vec<EntryConfig>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            original_value,
            children: Some(children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ledger {
        Ledger::new(vec![
            Category::Parent {
                entry: Entry::seed("electronics", "Electronics", 1500.0),
                children: vec![
                    Entry::seed("phones", "Phones", 800.0),
                    Entry::seed("laptops", "Laptops", 700.0),
                ],
            },
            Category::Leaf(Entry::seed("misc", "Misc", 50.0)),
        ])
    }

    #[test]
    fn given_seeded_entry_then_value_equals_baseline_and_variance_is_zero() {
        let entry = Entry::seed("phones", "Phones", 800.0);
        assert_eq!(entry.value(), 800.0);
        assert_eq!(entry.original_value(), 800.0);
        assert_eq!(entry.variance(), 0.0);
    }

    #[test]
    fn given_entry_when_setting_value_then_variance_follows() {
        let mut entry = Entry::seed("tables", "Tables", 300.0);
        entry.set_value(450.0);
        assert_eq!(entry.value(), 450.0);
        assert!((entry.variance() - 50.0).abs() < 1e-9);
        assert_eq!(entry.original_value(), 300.0);
    }

    #[test]
    fn given_ledger_when_listing_entries_then_roots_precede_their_children() {
        let ids: Vec<_> = sample().entries().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, vec!["electronics", "phones", "laptops", "misc"]);
    }

    #[test]
    fn given_ledger_when_finding_child_then_returns_entry() {
        let ledger = sample();
        assert_eq!(ledger.find("laptops").map(Entry::label), Some("Laptops"));
        assert!(ledger.find("chairs").is_none());
    }

    #[test]
    fn given_leaf_category_then_has_no_children() {
        let ledger = sample();
        assert!(ledger.categories()[1].children().is_none());
        assert!(!ledger.categories()[1].is_parent());
        assert_eq!(ledger.categories()[0].children().map(<[Entry]>::len), Some(2));
    }
}
