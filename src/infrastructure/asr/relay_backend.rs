use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{TranscriptionBackend, TranscriptionError};
use crate::domain::{Transcription, TranscriptionRequest};
use crate::infrastructure::http::{UpstreamTarget, map_send_error, read_error_body};

use super::audio_envelope::AudioEnvelope;
use super::response_normalizer;

pub const DEFAULT_RELAY_LANGUAGE: &str = "zh";

/// Forwards audio as a base64 JSON envelope to a relay service.
pub struct RelayBackend {
    client: Client,
    default_endpoint: Option<String>,
    default_language: String,
}

impl RelayBackend {
    pub fn new(client: Client, default_endpoint: Option<String>, default_language: &str) -> Self {
        Self {
            client,
            default_endpoint: default_endpoint.filter(|e| !e.trim().is_empty()),
            default_language: default_language.to_string(),
        }
    }

    fn endpoint<'a>(&'a self, request: &'a TranscriptionRequest) -> Option<&'a str> {
        request
            .upstream_url()
            .or(self.default_endpoint.as_deref())
    }
}

#[async_trait]
impl TranscriptionBackend for RelayBackend {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError> {
        let endpoint = self
            .endpoint(request)
            .ok_or(TranscriptionError::UpstreamRequired)?;
        let target = UpstreamTarget::parse(endpoint)?;
        let envelope = AudioEnvelope::from_request(request, &self.default_language);

        tracing::debug!(
            endpoint = %target,
            language = %envelope.language,
            enable_itn = envelope.enable_itn,
            "Sending audio to relay"
        );

        let response = self
            .client
            .post(target.url().clone())
            .json(&envelope)
            .send()
            .await
            .map_err(|e| map_send_error("relay request", e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = read_error_body(response).await;
            return Err(TranscriptionError::RelayFailed { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_send_error("relay response body", e))?;
        let json = response_normalizer::parse_json_body(&body)?;

        Ok(response_normalizer::from_relay(&json))
    }
}
