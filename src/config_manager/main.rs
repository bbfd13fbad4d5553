use serde::{Deserialize, Serialize};
use crate::config_manager::asr::ASRConfig;
use crate::config_manager::system::SystemConfig;

/// Main configuration for the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "asr_config")]
    #[serde(default)]
    pub asr_config: ASRConfig,
}

impl Config {
    /// Load configuration from a YAML or JSON file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{read_config_file, validate_config};
        let value = read_config_file(path)?;
        validate_config(&value)
    }
}
