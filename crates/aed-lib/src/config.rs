use crate::{decision::DecisionPolicy, metrics::sqi::QualityThresholds};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable thresholds, loadable from TOML. Omitted tables and keys keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AedConfig {
    pub decision: DecisionPolicy,
    pub quality: QualityThresholds,
}

pub fn parse_config(text: &str) -> Result<AedConfig> {
    Ok(toml::from_str(text)?)
}

pub fn read_config(path: &Path) -> Result<AedConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: AedConfig =
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

pub fn config_to_toml(config: &AedConfig) -> Result<String> {
    Ok(toml::to_string(config)?)
}
