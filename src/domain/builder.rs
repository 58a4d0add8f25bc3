//! Ledger builder: seeds a ledger from its initial configuration.

use std::collections::HashSet;

use tracing::{instrument, warn};

use crate::domain::entities::{Category, CategoryConfig, Entry, EntryConfig, Ledger};
use crate::domain::error::{DomainError, DomainResult};

/// Constructs a [`Ledger`] from an ordered list of root configurations.
///
/// Every entry starts with `value = original_value` and zero variance. Ids
/// share one namespace across roots and children.
#[derive(Debug, Default)]
pub struct LedgerBuilder {
    seen_ids: HashSet<String>,
}

impl LedgerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(self, config), fields(roots = config.len()))]
    pub fn build(&mut self, config: &[CategoryConfig]) -> DomainResult<Ledger> {
        self.seen_ids.clear();

        let categories = config
            .iter()
            .map(|category| self.build_category(category))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Ledger::new(categories))
    }

    fn build_category(&mut self, config: &CategoryConfig) -> DomainResult<Category> {
        let entry = self.seed_entry(&config.id, &config.label, config.original_value)?;

        let Some(children) = &config.children else {
            return Ok(Category::Leaf(entry));
        };

        let children = children
            .iter()
            .map(|child| self.build_child(child))
            .collect::<DomainResult<Vec<_>>>()?;

        let baseline_sum: f64 = children
            .iter()
            .fold(0.0, |total, child| total + child.original_value());
        if (baseline_sum - entry.original_value()).abs() > 1e-9 {
            warn!(
                id = entry.id(),
                baseline = entry.original_value(),
                children = baseline_sum,
                "parent baseline differs from the sum of its children"
            );
        }

        Ok(Category::Parent { entry, children })
    }

    fn build_child(&mut self, config: &EntryConfig) -> DomainResult<Entry> {
        self.seed_entry(&config.id, &config.label, config.original_value)
    }

    fn seed_entry(&mut self, id: &str, label: &str, original_value: f64) -> DomainResult<Entry> {
        if id.is_empty() {
            return Err(DomainError::EmptyId {
                label: label.to_string(),
            });
        }
        if !self.seen_ids.insert(id.to_string()) {
            return Err(DomainError::DuplicateId(id.to_string()));
        }
        if original_value == 0.0 {
            warn!(id, "zero baseline, variance for this entry will not be finite");
        }
        Ok(Entry::seed(id, label, original_value))
    }
}

impl Ledger {
    /// Build a ledger from its initial configuration.
    pub fn from_config(config: &[CategoryConfig]) -> DomainResult<Self> {
        LedgerBuilder::new().build(config)
    }
}
