//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsledger/rsledger.toml`
//! 3. Local config: `<project_dir>/.rsledger.toml`
//! 4. Environment variables: `RSLEDGER_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Default number of decimals when rendering amounts.
pub const DEFAULT_PRECISION: usize = 2;

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub ledger_file: Option<PathBuf>,
    pub precision: Option<usize>,
    pub color: Option<bool>,
}

/// Unified configuration for rsledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Ledger definition file (default: built-in ledger)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_file: Option<PathBuf>,
    /// Decimals shown for values and variances
    pub precision: usize,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger_file: None,
            precision: DEFAULT_PRECISION,
            color: true,
        }
    }
}

/// Get the XDG config directory for rsledger.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsledger").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsledger.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".rsledger.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    ///
    /// A relative `ledger_file` is resolved against `base_dir`, the directory
    /// of the file that declared it.
    fn merge_with(&self, overlay: &RawSettings, base_dir: Option<&Path>) -> Self {
        let ledger_file = overlay
            .ledger_file
            .as_ref()
            .map(|file| {
                let expanded = PathBuf::from(expand_path(&file.to_string_lossy()));
                match base_dir {
                    Some(dir) if expanded.is_relative() => dir.join(expanded),
                    _ => expanded,
                }
            })
            .or_else(|| self.ledger_file.clone());

        Self {
            ledger_file,
            precision: overlay.precision.unwrap_or(self.precision),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/rsledger/rsledger.toml`
    /// 3. Local config: `<project_dir>/.rsledger.toml`
    /// 4. Environment variables: `RSLEDGER_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw, global_path.parent());
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(project));
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply RSLEDGER_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RSLEDGER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("ledger_file") {
            settings.ledger_file = Some(PathBuf::from(expand_path(&val)));
        }
        if let Ok(val) = config.get_string("precision") {
            settings.precision = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("RSLEDGER_PRECISION={val}: {e}"),
            })?;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rsledger configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rsledger/rsledger.toml
#   Local:  <project_dir>/.rsledger.toml
#   Env:    RSLEDGER_* environment variables

# Ledger definition file (relative paths resolve against this file's directory).
# Without it the built-in Electronics/Furniture ledger is used.
# ledger_file = "ledger.toml"

# Decimals shown for values and variance percentages
# precision = 2

# Colored output (NO_COLOR and CLICOLOR are honored as well)
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
