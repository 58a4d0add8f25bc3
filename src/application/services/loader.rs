//! Ledger definition loading
//!
//! Reads the initial ledger configuration from a TOML file and seeds a ledger.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CategoryConfig, EntryConfig, Ledger};
use crate::infrastructure::traits::FileSystem;

/// On-disk form of a ledger's initial configuration.
///
/// ```toml
/// [[category]]
/// id = "electronics"
/// label = "Electronics"
/// original_value = 1500.0
///
///   [[category.children]]
///   id = "phones"
///   label = "Phones"
///   original_value = 800.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LedgerDefinition {
    #[serde(rename = "category", default)]
    pub categories: Vec<CategoryConfig>,
}

impl LedgerDefinition {
    /// Built-in ledger used when no definition file is configured.
    pub fn default_seed() -> Self {
        Self {
            categories: vec![
                CategoryConfig::parent(
                    "electronics",
                    "Electronics",
                    1500.0,
                    vec![
                        EntryConfig::new("phones", "Phones", 800.0),
                        EntryConfig::new("laptops", "Laptops", 700.0),
                    ],
                ),
                CategoryConfig::parent(
                    "furniture",
                    "Furniture",
                    1000.0,
                    vec![
                        EntryConfig::new("tables", "Tables", 300.0),
                        EntryConfig::new("chairs", "Chairs", 700.0),
                    ],
                ),
            ],
        }
    }

    /// Parse TOML content. `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::LedgerDefinition {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize ledger definition: {e}"),
        })
    }

    /// Seed a ledger from this definition.
    pub fn build(&self) -> ApplicationResult<Ledger> {
        Ok(Ledger::from_config(&self.categories)?)
    }
}

/// Service for reading and writing ledger definition files.
pub struct LedgerLoader {
    fs: Arc<dyn FileSystem>,
}

impl LedgerLoader {
    /// Create a new loader.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read a definition file and seed a ledger from it.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Ledger> {
        let definition = self.read_definition(path)?;
        debug!(roots = definition.categories.len(), "ledger definition parsed");
        definition.build()
    }

    /// Load `path` when given, otherwise the built-in default ledger.
    pub fn load_or_default(&self, path: Option<&Path>) -> ApplicationResult<Ledger> {
        match path {
            Some(path) => self.load(path),
            None => {
                debug!("no ledger file configured, using default ledger");
                LedgerDefinition::default_seed().build()
            }
        }
    }

    pub fn read_definition(&self, path: &Path) -> ApplicationResult<LedgerDefinition> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read ledger definition", path)?;
        LedgerDefinition::parse(&content, path)
    }

    /// Write a definition as TOML, refusing to overwrite unless `force` is set.
    #[instrument(level = "debug", skip(self, definition))]
    pub fn write_definition(
        &self,
        path: &Path,
        definition: &LedgerDefinition,
        force: bool,
    ) -> ApplicationResult<()> {
        if self.fs.exists(path) && !force {
            return Err(ApplicationError::LedgerExists(path.to_path_buf()));
        }
        let content = definition.to_toml()?;
        self.fs
            .ensure_parent(path)
            .with_write_context("create parent directory", path)?;
        self.fs
            .write(path, &content)
            .with_write_context("write ledger definition", path)?;
        info!("ledger definition written to {}", path.display());
        Ok(())
    }
}
