use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{TranscriptionBackend, TranscriptionError};
use crate::domain::{StorageLocator, Transcription, TranscriptionRequest, UploadPolicy};
use crate::infrastructure::http::{body_snippet, map_send_error, read_error_body};
use crate::infrastructure::observability::sanitize_prompt;

use super::dashscope_types::{GenerationRequest, PolicyEnvelope};
use super::response_normalizer;
use super::signed_upload_client::SignedUploadClient;

pub const DEFAULT_DASHSCOPE_BASE_URL: &str = "https://dashscope.aliyuncs.com";
pub const DEFAULT_DASHSCOPE_MODEL: &str = "qwen3-asr-flash";

const POLICY_PATH: &str = "/api/v1/uploads";
const GENERATION_PATH: &str = "/api/v1/services/aigc/multimodal-generation/generation";
const OSS_RESOURCE_RESOLVE_HEADER: &str = "X-DashScope-OssResourceResolve";

/// Direct DashScope ASR: fetch an upload policy, upload the audio to OSS,
/// then run multimodal generation against the uploaded object.
pub struct DashScopeBackend {
    client: Client,
    base_url: String,
    default_model: String,
    uploader: SignedUploadClient,
}

impl DashScopeBackend {
    pub fn new(client: Client, base_url: &str, default_model: &str) -> Self {
        Self {
            uploader: SignedUploadClient::new(client.clone()),
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model: default_model.to_string(),
        }
    }

    async fn fetch_policy(
        &self,
        model: &str,
        credential: &str,
    ) -> Result<UploadPolicy, TranscriptionError> {
        let url = format!("{}{}", self.base_url, POLICY_PATH);

        tracing::debug!(url = %url, model = %model, "Requesting upload policy");

        let response = self
            .client
            .get(&url)
            .query(&[("action", "getPolicy"), ("model", model)])
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| map_send_error("upload policy", e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = read_error_body(response).await;
            return Err(TranscriptionError::PolicyFetchFailed { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_send_error("upload policy body", e))?;
        let envelope: PolicyEnvelope = serde_json::from_str(&body).map_err(|e| {
            TranscriptionError::InvalidPolicyResponse(format!("{}: {}", e, body_snippet(&body)))
        })?;

        let policy = envelope.data.ok_or_else(|| {
            TranscriptionError::InvalidPolicyResponse(format!(
                "missing policy data: {}",
                body_snippet(&body)
            ))
        })?;
        if policy.upload_host.trim().is_empty() {
            return Err(TranscriptionError::InvalidPolicyResponse(
                "missing upload_host in policy response".to_string(),
            ));
        }

        tracing::debug!(
            upload_host = %policy.upload_host,
            upload_dir = %policy.upload_directory,
            has_security_token = policy.security_token.is_some(),
            "Upload policy received"
        );

        Ok(policy)
    }

    async fn recognize(
        &self,
        locator: &StorageLocator,
        model: &str,
        request: &TranscriptionRequest,
        credential: &str,
    ) -> Result<Transcription, TranscriptionError> {
        let url = format!("{}{}", self.base_url, GENERATION_PATH);
        let payload = GenerationRequest::new(
            model,
            &request.prompt,
            locator.as_str(),
            request.model.enable_itn(),
            request.language_hint(),
        );

        tracing::debug!(
            model = %model,
            locator = %locator,
            prompt = %sanitize_prompt(&request.prompt),
            "Calling DashScope ASR"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .header(OSS_RESOURCE_RESOLVE_HEADER, "enable")
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_send_error("ASR request", e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = read_error_body(response).await;
            return Err(TranscriptionError::AsrFailed { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_send_error("ASR response body", e))?;
        let json = response_normalizer::parse_json_body(&body)?;

        Ok(response_normalizer::from_generation(&json))
    }
}

#[async_trait]
impl TranscriptionBackend for DashScopeBackend {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError> {
        let credential = request
            .credential()
            .ok_or(TranscriptionError::NoServiceConfigured)?;
        let model = request.model.name_or(&self.default_model);

        let policy = self.fetch_policy(model, credential).await?;
        let locator = self.uploader.upload(&request.audio, &policy).await?;

        self.recognize(&locator, model, request, credential).await
    }
}
