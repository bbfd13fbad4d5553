use serde::{Deserialize, Serialize};

/// Configuration for Google Cloud Speech-to-Text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSpeechConfig {
    /// Falls back to `GOOGLE_SPEECH_API_KEY` when the key is left out.
    #[serde(rename = "api_key")]
    #[serde(default = "default_google_api_key")]
    pub api_key: String,

    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    #[serde(rename = "profanity_filter")]
    #[serde(default)]
    pub profanity_filter: bool,

    /// Recognition model, e.g. "latest_short"; provider default when unset.
    pub model: Option<String>,
}

fn default_google_api_key() -> String {
    std::env::var("GOOGLE_SPEECH_API_KEY").unwrap_or_default()
}

fn default_google_endpoint() -> String {
    "https://speech.googleapis.com".to_string()
}

impl Default for GoogleSpeechConfig {
    fn default() -> Self {
        Self {
            api_key: default_google_api_key(),
            endpoint: default_google_endpoint(),
            profanity_filter: false,
            model: None,
        }
    }
}

/// Configuration for an OpenAI-compatible Whisper endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperConfig {
    #[serde(rename = "api_key")]
    #[serde(default)]
    pub api_key: String,

    #[serde(rename = "base_url")]
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_whisper_model")]
    pub model: String,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_whisper_model() -> String {
    "whisper-1".to_string()
}

/// Configuration for Automatic Speech Recognition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ASRConfig {
    #[serde(rename = "asr_model")]
    #[serde(default = "default_asr_model")]
    pub asr_model: String,

    /// BCP-47 tag of the spoken language.
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(rename = "google_speech")]
    #[serde(default = "default_google_speech")]
    pub google_speech: Option<GoogleSpeechConfig>,

    #[serde(rename = "openai_whisper")]
    pub openai_whisper: Option<OpenAIWhisperConfig>,
}

fn default_asr_model() -> String {
    "google_speech".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_google_speech() -> Option<GoogleSpeechConfig> {
    Some(GoogleSpeechConfig::default())
}

impl Default for ASRConfig {
    fn default() -> Self {
        Self {
            asr_model: default_asr_model(),
            language: default_language(),
            google_speech: default_google_speech(),
            openai_whisper: None,
        }
    }
}
