use axum::body::Bytes;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::asr::{ASRInterface, RecognitionError};
use crate::audio::{decode_wav, DecodeError};

/// Everything that can go wrong between receiving an upload and getting a transcript
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("no audio file provided (expected a multipart field named \"audio\")")]
    MissingAudio,

    #[error("invalid multipart upload: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error("audio decoding task failed: {0}")]
    DecodeTask(String),
}

impl TranscriptionError {
    /// Upload problems are the client's fault; everything after that is
    /// reported in the body with 200.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranscriptionError::MissingAudio => StatusCode::BAD_REQUEST,
            TranscriptionError::Multipart { status, .. } => *status,
            _ => StatusCode::OK,
        }
    }
}

/// Response body: exactly one of `text` or `error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptionResponse {
    Text { text: String },
    Error { error: String },
}

impl From<Result<String, TranscriptionError>> for TranscriptionResponse {
    fn from(result: Result<String, TranscriptionError>) -> Self {
        match result {
            Ok(text) => TranscriptionResponse::Text { text },
            Err(e) => TranscriptionResponse::Error { error: e.to_string() },
        }
    }
}

/// Decode an uploaded file and run it through the recognizer
pub async fn transcribe_upload(
    asr: &dyn ASRInterface,
    language: &str,
    upload: Bytes,
) -> Result<String, TranscriptionError> {
    let request_id = Uuid::new_v4();
    let upload_len = upload.len();

    let buffer = tokio::task::spawn_blocking(move || decode_wav(&upload))
        .await
        .map_err(|e| TranscriptionError::DecodeTask(e.to_string()))?
        .map_err(|e| {
            info!("[{}] decode failed for {} byte upload: {}", request_id, upload_len, e);
            e
        })?;

    debug!(
        "[{}] decoded {} samples at {} Hz, {}-byte width ({:.2}s, {} source channel(s))",
        request_id,
        buffer.samples.len(),
        buffer.sample_rate,
        buffer.sample_width,
        buffer.duration().as_secs_f64(),
        buffer.source_channels
    );
    if buffer.is_silent() {
        debug!("[{}] upload contains only silence", request_id);
    }

    match asr.transcribe(&buffer, language).await {
        Ok(text) => {
            info!("[{}] {} transcribed {:.2}s of audio", request_id, asr.name(), buffer.duration().as_secs_f64());
            Ok(text)
        }
        Err(e) => {
            info!("[{}] {} recognition failed: {}", request_id, asr.name(), e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;
    use async_trait::async_trait;

    struct EchoLengthASR;

    #[async_trait]
    impl ASRInterface for EchoLengthASR {
        async fn transcribe(&self, audio: &AudioBuffer, language: &str) -> Result<String, RecognitionError> {
            Ok(format!("{} {}", audio.samples.len(), language))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn wav(samples: &[i16]) -> Bytes {
        AudioBuffer::new(samples.to_vec(), 8_000, 1).to_wav_bytes().unwrap().into()
    }

    #[tokio::test]
    async fn decoded_buffer_reaches_recognizer() {
        let text = transcribe_upload(&EchoLengthASR, "en-GB", wav(&[1, 2, 3])).await.unwrap();
        assert_eq!(text, "3 en-GB");
    }

    #[tokio::test]
    async fn decode_failure_short_circuits() {
        let err = transcribe_upload(&EchoLengthASR, "en-US", Bytes::new()).await.unwrap_err();
        assert!(matches!(err, TranscriptionError::Decode(DecodeError::Empty)));
        assert_eq!(err.status_code(), StatusCode::OK);
    }

    #[test]
    fn response_serializes_to_a_single_key() {
        let ok: TranscriptionResponse = Ok::<_, TranscriptionError>("hi".to_string()).into();
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"text":"hi"}"#);

        let err: TranscriptionResponse =
            Err::<String, _>(TranscriptionError::Recognition(RecognitionError::UnknownValue)).into();
        assert_eq!(serde_json::to_string(&err).unwrap(), r#"{"error":"could not understand audio"}"#);
    }

    #[test]
    fn upload_errors_are_client_errors() {
        assert_eq!(TranscriptionError::MissingAudio.status_code(), StatusCode::BAD_REQUEST);
        let multipart = TranscriptionError::Multipart {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "too big".to_string(),
        };
        assert_eq!(multipart.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
