use std::sync::Arc;

use crate::asr::{ASRFactory, ASRInterface};
use crate::config_manager::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub asr: Arc<dyn ASRInterface>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let asr = ASRFactory::create_asr(&config.asr_config)?;
        Ok(Self::with_asr(config, asr))
    }

    pub fn with_asr(config: Config, asr: Arc<dyn ASRInterface>) -> Self {
        Self {
            config: Arc::new(config),
            asr,
        }
    }

    pub fn language(&self) -> &str {
        &self.config.asr_config.language
    }
}
