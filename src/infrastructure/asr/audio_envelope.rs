use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use crate::domain::TranscriptionRequest;

/// JSON request shape understood by relay services: base64 audio plus
/// recognition hints.
#[derive(Debug, Serialize)]
pub struct AudioEnvelope<'a> {
    pub audio_file: EnvelopeAudio<'a>,
    pub context: &'a str,
    pub language: &'a str,
    pub enable_itn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeAudio<'a> {
    pub data: String,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub mime_type: &'a str,
    pub size: usize,
}

impl<'a> AudioEnvelope<'a> {
    /// `default_language` replaces `auto`, relays expect an explicit language.
    pub fn from_request(request: &'a TranscriptionRequest, default_language: &'a str) -> Self {
        let audio = &request.audio;
        Self {
            audio_file: EnvelopeAudio {
                data: general_purpose::STANDARD.encode(&audio.data),
                name: &audio.filename,
                mime_type: &audio.mime_type,
                size: audio.size(),
            },
            context: &request.prompt,
            language: request.language_hint().unwrap_or(default_language),
            enable_itn: request.model.enable_itn(),
            model: request.model.name(),
        }
    }
}
