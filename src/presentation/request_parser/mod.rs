//! Transport bodies to canonical [`TranscriptionRequest`]s.

mod json_body;
mod multipart_body;

pub use json_body::decode_audio;

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};

use crate::application::ports::TranscriptionError;
use crate::domain::{AudioFile, AuthScheme, CustomAuth, TranscriptionRequest};

/// Body encodings accepted on the transcription endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestBodyParser {
    JsonBody,
    MultipartBody,
}

impl RequestBodyParser {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.to_ascii_lowercase().contains("application/json") => Self::JsonBody,
            _ => Self::MultipartBody,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_content_type(headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()))
    }

    pub async fn parse(self, request: Request) -> Result<TranscriptionRequest, TranscriptionError> {
        let credential = bearer_token(request.headers());
        let origin_host = request
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let fields = match self {
            Self::JsonBody => json_body::parse(request).await?,
            Self::MultipartBody => multipart_body::parse(request).await?,
        };

        let mut canonical = fields.into_request()?;
        if let Some(credential) = credential {
            canonical = canonical.with_credential(credential);
        }
        if let Some(host) = origin_host {
            canonical = canonical.with_origin_host(host);
        }

        Ok(canonical)
    }
}

/// Token from `Authorization: Bearer <token>`, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Fields common to both encodings, before validation.
#[derive(Debug, Default)]
pub(crate) struct RawFields {
    pub audio: Option<AudioFile>,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub upstream_url: Option<String>,
    pub custom_key: Option<String>,
    pub custom_header: Option<String>,
}

impl RawFields {
    fn into_request(self) -> Result<TranscriptionRequest, TranscriptionError> {
        let audio = self
            .audio
            .filter(AudioFile::has_valid_name)
            .ok_or(TranscriptionError::MissingFile)?;

        let scheme = match self.custom_header.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<AuthScheme>().map_err(|_| {
                TranscriptionError::InvalidRequestBody(format!(
                    "unsupported custom_header: {}, expected Authorization, X-API-Key or none",
                    raw
                ))
            })?),
        };
        let custom_auth = CustomAuth::new(
            self.custom_key.unwrap_or_default().trim().to_string(),
            scheme,
        );

        Ok(TranscriptionRequest::new(audio)
            .with_language(self.language.unwrap_or_default())
            .with_prompt(self.prompt.unwrap_or_default())
            .with_model(self.model.as_deref().unwrap_or_default())
            .with_upstream_url(self.upstream_url.unwrap_or_default())
            .with_custom_auth(custom_auth))
    }
}
