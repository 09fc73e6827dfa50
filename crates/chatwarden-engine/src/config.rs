//! Engine configuration

use chatwarden_oracles::{ClassifierEndpoints, JudgeSettings};
use chatwarden_sentiment::RewardConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the screening engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Classification oracle endpoints
    #[serde(default)]
    pub classifier: ClassifierEndpoints,

    /// Policy judge backend settings
    #[serde(default)]
    pub judge: JudgeSettings,

    /// Gating and reward parameters
    #[serde(default)]
    pub rewards: RewardConfig,
}

impl WardenConfig {
    /// Load configuration from a YAML file, or defaults if the file does
    /// not exist
    pub fn load(config_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = config_path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }
}
