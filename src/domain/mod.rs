//! Domain layer: ledger entities and the allocation engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod allocation;
pub mod builder;
pub mod entities;
pub mod error;
pub mod variance;

pub use aggregate::grand_total;
pub use allocation::{Adjustment, Allocation, AllocationKind, AllocationTarget};
pub use builder::LedgerBuilder;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use variance::variance;
