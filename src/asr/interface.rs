use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::audio::AudioBuffer;

/// Failures reported by a speech recognition provider
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("recognition request failed: {0}")]
    Request(String),

    #[error("recognition provider rejected the request ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("could not understand audio")]
    UnknownValue,

    #[error("invalid response from recognition provider: {0}")]
    InvalidResponse(String),

    #[error("failed to encode audio for the recognition provider: {0}")]
    Encoding(String),
}

impl From<reqwest::Error> for RecognitionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RecognitionError::InvalidResponse(e.to_string())
        } else {
            RecognitionError::Request(e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl RecognitionError {
    /// Build a provider error from a non-2xx response body.
    ///
    /// Google and OpenAI both wrap failures as `{"error": {"message": ...}}`;
    /// anything else is passed through as raw text.
    pub fn from_provider_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error.message,
            Err(_) if body.trim().is_empty() => "no error details provided".to_string(),
            Err(_) => body.trim().to_string(),
        };
        RecognitionError::Provider { status, message }
    }

    /// Turn a non-2xx response into an error, keeping transport failures
    /// that happen while reading the body.
    pub async fn from_error_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => Self::from_provider_body(status, &body),
            Err(e) => e.into(),
        }
    }
}

/// ASR interface for external speech recognition providers
#[async_trait]
pub trait ASRInterface: Send + Sync {
    /// Transcribe a decoded buffer
    ///
    /// # Arguments
    /// * `audio` - Mono 16-bit PCM buffer
    /// * `language` - BCP-47 language tag, e.g. "en-US"
    async fn transcribe(&self, audio: &AudioBuffer, language: &str) -> Result<String, RecognitionError>;

    /// Provider name used in logs
    fn name(&self) -> &str;
}
