//! Pending row input and the numeric parse contract for allocation amounts.
//!
//! Text typed against a row is held here, apart from the committed ledger,
//! until an allocation is fired for that row.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::services::LedgerService;
use crate::domain::{Allocation, AllocationKind};

fn amount_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("amount pattern is valid")
    })
}

/// Parse user-entered text into an allocation amount.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"12.5abc"` is `12.5`. Empty or non-numeric text yields `0.0`.
pub fn parse_amount(text: &str) -> f64 {
    amount_prefix()
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Unconfirmed text per row id.
#[derive(Debug, Clone, Default)]
pub struct PendingInputs {
    inputs: HashMap<String, String>,
}

impl PendingInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the raw text currently entered for a row.
    pub fn set(&mut self, row_id: impl Into<String>, text: impl Into<String>) {
        self.inputs.insert(row_id.into(), text.into());
    }

    pub fn get(&self, row_id: &str) -> Option<&str> {
        self.inputs.get(row_id).map(String::as_str)
    }

    pub fn clear(&mut self, row_id: &str) -> Option<String> {
        self.inputs.remove(row_id)
    }

    /// Parsed amount for a row; `0.0` when nothing was entered.
    pub fn amount(&self, row_id: &str) -> f64 {
        self.get(row_id).map(parse_amount).unwrap_or(0.0)
    }

    /// Fire an allocation for `row_id` using its pending text.
    ///
    /// The pending text stays in place afterwards.
    #[instrument(level = "debug", skip(self, service))]
    pub fn commit(&self, service: &LedgerService, row_id: &str, kind: AllocationKind) -> Allocation {
        let amount = self.amount(row_id);
        debug!(amount, "committing pending input");
        service.apply(row_id, kind.with_amount(amount))
    }
}
