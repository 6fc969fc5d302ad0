//! Access configuration loaded from `~/.config/media-access/access.toml`.
//!
//! ```toml
//! [recipes]
//! block = "cache_block"
//! byte = "prefetch,cache_read"
//!
//! [modules]
//! disabled = ["directory"]
//!
//! [modules.priority]
//! file = 80
//!
//! [access]
//! pts_delay_ms = 300
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::stream::adapter::ReadStrategy;

/// Filter recipes requested per read strategy. Empty disables decoration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Recipes {
    pub block: String,
    pub byte: String,
}

impl Default for Recipes {
    fn default() -> Self {
        Self {
            block: "cache_block".to_string(),
            byte: "prefetch,cache_read".to_string(),
        }
    }
}

/// Module selection overrides.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ModulesConfig {
    /// Module names never used for resolution.
    pub disabled: Vec<String>,
    /// Priority overrides by module name.
    pub priority: HashMap<String, i32>,
}

/// Settings passed to backends.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccessSettings {
    /// Default pts delay reported by local backends, in milliseconds.
    pub pts_delay_ms: u64,
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self { pts_delay_ms: 300 }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AccessConfig {
    pub recipes: Recipes,
    pub modules: ModulesConfig,
    pub access: AccessSettings,
}

impl AccessConfig {
    /// Recipe to wrap a stream of the given strategy with, if any.
    #[must_use]
    pub fn recipe_for(&self, strategy: ReadStrategy) -> Option<&str> {
        let recipe = match strategy {
            ReadStrategy::Block => &self.recipes.block,
            ReadStrategy::Byte => &self.recipes.byte,
            ReadStrategy::None => return None,
        };
        let recipe = recipe.trim();
        (!recipe.is_empty()).then_some(recipe)
    }

    #[must_use]
    pub fn pts_delay(&self) -> Duration {
        Duration::from_millis(self.access.pts_delay_ms)
    }

    #[must_use]
    pub fn is_disabled(&self, module: &str) -> bool {
        self.modules.disabled.iter().any(|name| name == module)
    }

    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this schema.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid access configuration")
    }
}

/// Load the configuration from `path`, or from the default location.
///
/// Returns defaults if the default file doesn't exist (configuration is
/// optional). An explicit `path` must exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: Option<&Path>) -> Result<AccessConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let path = config_path();
            if !path.exists() {
                return Ok(AccessConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
}

/// Return the path to the default config file.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("media-access")
        .join("access.toml")
}
