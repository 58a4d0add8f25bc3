//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod ledger;
mod loader;

pub use ledger::LedgerService;
pub use loader::{LedgerDefinition, LedgerLoader};
