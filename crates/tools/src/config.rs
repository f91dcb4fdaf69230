//! Optional TOML configuration for the command-line tools.
//!
//! ```toml
//! run_seed = 42
//! total_levels = 12
//!
//! [lattice]
//! width = 10
//! height = 15
//! start = { x = 8, y = 13 }
//! finish = { x = 1, y = 1 }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use labyrinth_core::{GenerationConfig, TOTAL_LEVELS};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub run_seed: Option<u64>,
    pub total_levels: u32,
    pub lattice: GenerationConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self { run_seed: None, total_levels: TOTAL_LEVELS, lattice: GenerationConfig::default() }
    }
}

impl ToolConfig {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse tool config TOML")?;
        config.lattice.validate().context("Invalid [lattice] section")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("In config file {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
