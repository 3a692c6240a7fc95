use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};

use crate::application::ports::{TranscriptionBackend, TranscriptionError};
use crate::domain::{Transcription, TranscriptionRequest};
use crate::infrastructure::http::multipart_encoder::{self, FormField};
use crate::infrastructure::http::{UpstreamTarget, body_snippet, map_send_error};
use crate::infrastructure::observability::mask_secret;

use super::audio_envelope::AudioEnvelope;
use super::response_normalizer;

pub const DEFAULT_PROXY_MODEL: &str = "whisper-1";

const COMMON_API_PATHS: [&str; 4] = [
    "/api/v1/audio/transcriptions",
    "/v1/transcriptions",
    "/transcribe",
    "/api/transcribe",
];

/// Encodings tried against a caller-supplied proxy, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyAttempt {
    /// OpenAI-compatible `multipart/form-data`.
    Multipart,
    /// Base64 JSON envelope, for relay-style proxies.
    JsonFallback,
}

impl ProxyAttempt {
    /// Where to go after this attempt got a non-2xx status or no response
    /// at all. A 2xx never transitions, whatever its body.
    pub fn on_rejected(self) -> Option<ProxyAttempt> {
        match self {
            ProxyAttempt::Multipart => Some(ProxyAttempt::JsonFallback),
            ProxyAttempt::JsonFallback => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ProxyAttempt::Multipart => "multipart",
            ProxyAttempt::JsonFallback => "json",
        }
    }
}

enum AttemptOutcome {
    Accepted(String),
    Rejected { status: u16, body: String },
    Unreachable(TranscriptionError),
}

/// OpenAI-compatible or relay-style proxy at a caller-supplied URL, with
/// caller-supplied credentials.
pub struct CustomProxyBackend {
    client: Client,
    default_model: String,
    fallback_language: String,
    blocked_host_fragments: Vec<String>,
}

impl CustomProxyBackend {
    pub fn new(
        client: Client,
        default_model: &str,
        fallback_language: &str,
        blocked_host_fragments: Vec<String>,
    ) -> Self {
        Self {
            client,
            default_model: default_model.to_string(),
            fallback_language: fallback_language.to_string(),
            blocked_host_fragments,
        }
    }

    async fn send(
        &self,
        attempt: ProxyAttempt,
        target: &UpstreamTarget,
        request: &TranscriptionRequest,
    ) -> Result<AttemptOutcome, TranscriptionError> {
        let builder = match attempt {
            ProxyAttempt::Multipart => self.multipart_request(target, request),
            ProxyAttempt::JsonFallback => self
                .authorized(target, request)
                .json(&AudioEnvelope::from_request(request, &self.fallback_language)),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Ok(AttemptOutcome::Unreachable(map_send_error("custom proxy", e))),
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_send_error("custom proxy response body", e));

        if status.is_success() {
            Ok(AttemptOutcome::Accepted(body?))
        } else {
            Ok(AttemptOutcome::Rejected {
                status: status.as_u16(),
                body: body.unwrap_or_else(|_| "unknown error".to_string()),
            })
        }
    }

    fn multipart_request(
        &self,
        target: &UpstreamTarget,
        request: &TranscriptionRequest,
    ) -> RequestBuilder {
        let audio = &request.audio;
        let model = request.model.name_or(&self.default_model);

        let mut fields = vec![
            FormField::file("file", &audio.filename, &audio.mime_type, &audio.data),
            FormField::text("model", model),
        ];
        if let Some(language) = request.language_hint() {
            fields.push(FormField::text("language", language));
        }
        if !request.prompt.is_empty() {
            fields.push(FormField::text("prompt", &request.prompt));
        }

        let boundary = multipart_encoder::generate_boundary();
        let body = multipart_encoder::encode(&fields, &boundary);

        self.authorized(target, request)
            .header(CONTENT_TYPE, multipart_encoder::content_type_header(&boundary))
            .body(body)
    }

    fn authorized(&self, target: &UpstreamTarget, request: &TranscriptionRequest) -> RequestBuilder {
        let builder = self.client.post(target.url().clone());
        match request.custom_auth.header() {
            Some((name, value)) => builder.header(name, value),
            None => builder,
        }
    }
}

#[async_trait]
impl TranscriptionBackend for CustomProxyBackend {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError> {
        let upstream = request
            .upstream_url()
            .ok_or(TranscriptionError::UpstreamRequired)?;
        let target = UpstreamTarget::parse(upstream)?;
        target.ensure_not_self(request.origin_host.as_deref(), &self.blocked_host_fragments)?;

        tracing::debug!(
            target = %target,
            scheme = ?request.custom_auth.scheme,
            key = %mask_secret(&request.custom_auth.key),
            "Forwarding audio to custom proxy"
        );

        let mut attempt = ProxyAttempt::Multipart;
        loop {
            let outcome = self.send(attempt, &target, request).await?;

            let (status, body) = match outcome {
                AttemptOutcome::Accepted(body) => {
                    tracing::debug!(attempt = attempt.as_str(), "Custom proxy accepted request");
                    let json = response_normalizer::parse_json_body(&body)?;
                    return Ok(response_normalizer::from_proxy(&json));
                }
                AttemptOutcome::Rejected { status, body } => (Some(status), body),
                AttemptOutcome::Unreachable(error) => {
                    if attempt.on_rejected().is_none() {
                        return Err(error);
                    }
                    (None, error.to_string())
                }
            };

            match attempt.on_rejected() {
                Some(next) => {
                    tracing::warn!(
                        attempt = attempt.as_str(),
                        status = status,
                        body = %body_snippet(&body),
                        "Custom proxy rejected request, retrying with {} encoding",
                        next.as_str()
                    );
                    attempt = next;
                }
                None => {
                    let status = status.unwrap_or_default();
                    let hints = remediation_hints(&target, status, &body);
                    return Err(TranscriptionError::CustomProxyFailed {
                        status,
                        body,
                        hints,
                    });
                }
            }
        }
    }
}

/// Suggestions for the common misconfigurations behind a rejected proxy call.
pub fn remediation_hints(target: &UpstreamTarget, status: u16, body: &str) -> Vec<String> {
    let lower = body.to_ascii_lowercase();
    let mut hints = Vec::new();

    if status == 405 || body.contains("MethodNotAllowed") || lower.contains("method not allowed") {
        let raw = target.as_str();
        if raw.ends_with('/') {
            hints.push("remove the trailing slash from the URL".to_string());
        }
        for path in COMMON_API_PATHS {
            if !raw.contains(path) {
                hints.push(format!("try adding the path {}", path));
            }
        }
        if target.url().path().trim_matches('/').is_empty() {
            hints.push("the URL has no API path, it probably needs an API path prefix".to_string());
        }
    } else if status == 404 || lower.contains("not found") {
        hints.push(format!(
            "the proxy returned not found, check the proxy address and path: {}",
            target
        ));
    }

    hints
}
