use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::interface::{ASRInterface, RecognitionError};
use crate::audio::AudioBuffer;
use crate::config_manager::GoogleSpeechConfig;

/// Google Cloud Speech-to-Text v1 client (`speech:recognize`)
pub struct GoogleSpeechASR {
    client: Client,
    api_key: String,
    endpoint: String,
    profanity_filter: bool,
    model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    audio_channel_count: u16,
    language_code: &'a str,
    profanity_filter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechRecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionResult {
    #[serde(default)]
    alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionAlternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

impl GoogleSpeechASR {
    pub fn new(config: &GoogleSpeechConfig) -> Self {
        if config.api_key.is_empty() {
            warn!("Google Speech API key is empty; requests will be rejected by the provider");
        }
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            profanity_filter: config.profanity_filter,
            model: config.model.clone(),
        }
    }

    fn build_request<'a>(&'a self, audio: &AudioBuffer, language: &'a str) -> RecognizeRequest<'a> {
        RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: audio.sample_rate,
                audio_channel_count: 1,
                language_code: language,
                profanity_filter: self.profanity_filter,
                model: self.model.as_deref(),
            },
            audio: RecognitionAudio {
                content: STANDARD.encode(audio.to_le_bytes()),
            },
        }
    }
}

#[async_trait]
impl ASRInterface for GoogleSpeechASR {
    async fn transcribe(&self, audio: &AudioBuffer, language: &str) -> Result<String, RecognitionError> {
        let url = format!("{}/v1/speech:recognize", self.endpoint);
        let request = self.build_request(audio, language);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecognitionError::from_error_response(response).await);
        }

        let result: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::InvalidResponse(e.to_string()))?;

        // Each result covers a consecutive stretch of audio; take its top alternative.
        let transcript = result
            .results
            .iter()
            .filter_map(|r| r.alternatives.first())
            .inspect(|alt| debug!("Google alternative confidence: {:?}", alt.confidence))
            .map(|alt| alt.transcript.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.is_empty() {
            return Err(RecognitionError::UnknownValue);
        }
        Ok(transcript)
    }

    fn name(&self) -> &str {
        "google_speech"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn asr_for(server: &MockServer) -> GoogleSpeechASR {
        GoogleSpeechASR::new(&GoogleSpeechConfig {
            api_key: "test-key".to_string(),
            endpoint: server.uri(),
            profanity_filter: false,
            model: None,
        })
    }

    fn buffer() -> AudioBuffer {
        AudioBuffer::new(vec![1, -1, 2, -2], 16_000, 1)
    }

    #[tokio::test]
    async fn returns_top_alternative() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/speech:recognize"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "config": {
                    "encoding": "LINEAR16",
                    "sampleRateHertz": 16000,
                    "audioChannelCount": 1,
                    "languageCode": "en-US"
                },
                "audio": { "content": STANDARD.encode([1u8, 0, 255, 255, 2, 0, 254, 255]) }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "alternatives": [
                        { "transcript": "hello world", "confidence": 0.94 },
                        { "transcript": "hello word", "confidence": 0.41 }
                    ]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = asr_for(&server).transcribe(&buffer(), "en-US").await.unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn joins_consecutive_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "alternatives": [{ "transcript": "hello" }] },
                    { "alternatives": [{ "transcript": " world" }] }
                ]
            })))
            .mount(&server)
            .await;

        let text = asr_for(&server).transcribe(&buffer(), "en-US").await.unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn empty_response_is_unknown_value() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = asr_for(&server).transcribe(&buffer(), "en-US").await.unwrap_err();
        assert_eq!(err, RecognitionError::UnknownValue);
        assert_eq!(err.to_string(), "could not understand audio");
    }

    #[tokio::test]
    async fn rejected_key_surfaces_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let err = asr_for(&server).transcribe(&buffer(), "en-US").await.unwrap_err();
        assert_eq!(
            err,
            RecognitionError::Provider {
                status: 400,
                message: "API key not valid. Please pass a valid API key.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = asr_for(&server).transcribe(&buffer(), "en-US").await.unwrap_err();
        assert!(matches!(err, RecognitionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_request_error() {
        let asr = GoogleSpeechASR::new(&GoogleSpeechConfig {
            api_key: "k".to_string(),
            endpoint: "http://127.0.0.1:1".to_string(),
            profanity_filter: false,
            model: None,
        });
        let err = asr.transcribe(&buffer(), "en-US").await.unwrap_err();
        assert!(matches!(err, RecognitionError::Request(_)));
    }
}
