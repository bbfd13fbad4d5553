use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, warn};

use crate::state::AppState;
use crate::transcription::{transcribe_upload, TranscriptionError, TranscriptionResponse};

/// Multipart field carrying the audio file
pub const AUDIO_FIELD: &str = "audio";

/// `POST /speech-to-text`
///
/// Always answers with a JSON body holding either `text` or `error`.
pub async fn speech_to_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<TranscriptionResponse>) {
    let result = match multipart {
        Ok(multipart) => match read_audio_field(multipart).await {
            Ok(upload) => transcribe_upload(state.asr.as_ref(), state.language(), upload).await,
            Err(e) => Err(e),
        },
        Err(rejection) => Err(TranscriptionError::Multipart {
            status: rejection.status(),
            message: rejection.body_text(),
        }),
    };

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            let status = e.status_code();
            if status != StatusCode::OK {
                warn!("Rejected upload ({}): {}", status, e);
            }
            status
        }
    };

    (status, Json(result.into()))
}

/// Scan the form for the audio part and read it completely
async fn read_audio_field(mut multipart: Multipart) -> Result<Bytes, TranscriptionError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AUDIO_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        debug!(
            "Receiving audio upload: file_name={:?}, content_type={:?}",
            field.file_name(),
            field.content_type()
        );
        return field.bytes().await.map_err(multipart_error);
    }

    Err(TranscriptionError::MissingAudio)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> TranscriptionError {
    TranscriptionError::Multipart {
        status: e.status(),
        message: e.body_text(),
    }
}
