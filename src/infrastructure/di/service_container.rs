//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;
use crate::application::services::{LedgerLoader, LedgerService};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Ledger definition loader
    pub loader: LedgerLoader,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let loader = LedgerLoader::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            loader,
        }
    }

    /// Seed a ledger service.
    ///
    /// `ledger_file` overrides the configured file; with neither, the
    /// built-in default ledger is used.
    pub fn ledger_service(&self, ledger_file: Option<&Path>) -> InfraResult<LedgerService> {
        let path = ledger_file.or(self.settings.ledger_file.as_deref());
        debug!(?path, "seeding ledger");
        let ledger = self.loader.load_or_default(path)?;
        Ok(LedgerService::new(ledger))
    }
}
