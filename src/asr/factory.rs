use std::sync::Arc;
use anyhow::Result;
use tracing::info;

use super::google::GoogleSpeechASR;
use super::interface::ASRInterface;
use super::openai::OpenAIWhisperASR;
use crate::config_manager::ASRConfig;

/// Factory for creating ASR provider clients
pub struct ASRFactory;

impl ASRFactory {
    /// Create the provider client selected by `asr_model`
    pub fn create_asr(asr_config: &ASRConfig) -> Result<Arc<dyn ASRInterface>> {
        info!("Initializing ASR provider: {}", asr_config.asr_model);

        match asr_config.asr_model.as_str() {
            "google_speech" => {
                let config = asr_config.google_speech.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("asr_model is google_speech but google_speech config is missing")
                })?;
                Ok(Arc::new(GoogleSpeechASR::new(config)))
            }
            "openai_whisper" => {
                let config = asr_config.openai_whisper.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("asr_model is openai_whisper but openai_whisper config is missing")
                })?;
                Ok(Arc::new(OpenAIWhisperASR::new(config)))
            }
            other => Err(anyhow::anyhow!("Unsupported ASR provider: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_manager::{GoogleSpeechConfig, OpenAIWhisperConfig};

    #[test]
    fn creates_default_google_provider() {
        let asr = ASRFactory::create_asr(&ASRConfig::default()).unwrap();
        assert_eq!(asr.name(), "google_speech");
    }

    #[test]
    fn creates_openai_provider() {
        let config = ASRConfig {
            asr_model: "openai_whisper".to_string(),
            openai_whisper: Some(OpenAIWhisperConfig {
                api_key: "k".to_string(),
                base_url: "http://localhost:9".to_string(),
                model: "whisper-1".to_string(),
            }),
            ..ASRConfig::default()
        };
        assert_eq!(ASRFactory::create_asr(&config).unwrap().name(), "openai_whisper");
    }

    #[test]
    fn missing_provider_section_is_an_error() {
        let config = ASRConfig {
            asr_model: "openai_whisper".to_string(),
            openai_whisper: None,
            google_speech: Some(GoogleSpeechConfig::default()),
            ..ASRConfig::default()
        };
        let err = ASRFactory::create_asr(&config).err().unwrap();
        assert!(err.to_string().contains("openai_whisper config is missing"));
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let config = ASRConfig {
            asr_model: "sphinx".to_string(),
            ..ASRConfig::default()
        };
        let err = ASRFactory::create_asr(&config).err().unwrap();
        assert_eq!(err.to_string(), "Unsupported ASR provider: sphinx");
    }
}
