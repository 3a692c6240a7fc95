use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;

use crate::application::ports::TranscriptionError;
use crate::domain::AudioFile;

use super::RawFields;

const DEFAULT_JSON_FILENAME: &str = "audio.wav";

#[derive(Debug, Deserialize)]
struct JsonTranscriptionBody {
    #[serde(default)]
    audio_file: Option<JsonAudio>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    upstream_url: Option<String>,
    #[serde(default)]
    custom_key: Option<String>,
    #[serde(default)]
    custom_header: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonAudio {
    Encoded(String),
    Object {
        #[serde(default)]
        data: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "type")]
        mime_type: Option<String>,
    },
}

pub(super) async fn parse(request: Request) -> Result<RawFields, TranscriptionError> {
    let bytes = Bytes::from_request(request, &())
        .await
        .map_err(|e| TranscriptionError::InvalidRequestBody(e.body_text()))?;

    let body: JsonTranscriptionBody = serde_json::from_slice(&bytes)
        .map_err(|e| TranscriptionError::InvalidRequestBody(format!("failed to parse JSON: {}", e)))?;

    let audio = match body.audio_file {
        Some(JsonAudio::Encoded(encoded)) => Some(AudioFile::new(
            decode_audio(&encoded)?,
            DEFAULT_JSON_FILENAME,
            None,
        )),
        Some(JsonAudio::Object {
            data: Some(encoded),
            name,
            mime_type,
        }) => Some(AudioFile::new(
            decode_audio(&encoded)?,
            name.filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_JSON_FILENAME.to_string()),
            mime_type.as_deref(),
        )),
        Some(JsonAudio::Object { data: None, .. }) | None => None,
    };

    Ok(RawFields {
        audio,
        language: body.language,
        prompt: body.prompt.filter(|p| !p.is_empty()).or(body.context),
        model: body.model,
        upstream_url: body.upstream_url,
        custom_key: body.custom_key,
        custom_header: body.custom_header,
    })
}

/// Accepts bare base64 or a `data:<mime>;base64,<payload>` URI.
pub fn decode_audio(encoded: &str) -> Result<Vec<u8>, TranscriptionError> {
    let payload = match encoded.split_once("base64,") {
        Some((_, payload)) => payload,
        None => encoded,
    };
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    general_purpose::STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| TranscriptionError::InvalidAudioEncoding(e.to_string()))
}
