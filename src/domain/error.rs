//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the ledger's structural invariants.
/// They can only arise while building a ledger; allocations never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate ledger id: {0}")]
    DuplicateId(String),

    #[error("empty id for ledger entry '{label}'")]
    EmptyId { label: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
