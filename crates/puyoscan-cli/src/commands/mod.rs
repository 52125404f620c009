pub mod calibrate;
pub mod classify;
pub mod config;
pub mod profiles;
pub mod regions;

use std::path::Path;

use anyhow::{Context, Result};
use puyoscan_core::pipeline::AnalyzerConfig;

/// Read an analyzer config from TOML, or fall back to the defaults.
pub fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    let Some(path) = path else {
        return Ok(AnalyzerConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: AnalyzerConfig = toml::from_str(&contents).context("Invalid analyzer config")?;
    config.validate().context("Invalid analyzer config")?;
    Ok(config)
}
