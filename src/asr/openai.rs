use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use tracing::warn;

use super::interface::{ASRInterface, RecognitionError};
use crate::audio::AudioBuffer;
use crate::config_manager::OpenAIWhisperConfig;

/// Client for OpenAI-compatible `/audio/transcriptions` endpoints
pub struct OpenAIWhisperASR {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

impl OpenAIWhisperASR {
    pub fn new(config: &OpenAIWhisperConfig) -> Self {
        if config.api_key.is_empty() {
            warn!("OpenAI API key is empty; requests will likely be rejected");
        }
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

/// Whisper takes ISO-639-1 codes, so "en-US" becomes "en".
fn iso_639_1(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or(language)
        .to_lowercase()
}

#[async_trait]
impl ASRInterface for OpenAIWhisperASR {
    async fn transcribe(&self, audio: &AudioBuffer, language: &str) -> Result<String, RecognitionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let wav = audio
            .to_wav_bytes()
            .map_err(|e| RecognitionError::Encoding(e.to_string()))?;
        let file_part = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .text("language", iso_639_1(language))
            .part("file", file_part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecognitionError::from_error_response(response).await);
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::InvalidResponse(e.to_string()))?;

        let text = result.text.trim();
        if text.is_empty() {
            return Err(RecognitionError::UnknownValue);
        }
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "openai_whisper"
    }
}
