use chrono::Utc;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use uuid::Uuid;

use crate::application::ports::TranscriptionError;
use crate::domain::{AudioFile, StorageLocator, UploadPolicy};
use crate::infrastructure::http::multipart_encoder::{self, FormField};
use crate::infrastructure::http::{map_send_error, read_error_body};

const SUCCESS_ACTION_STATUS: &str = "200";

/// Uploads audio to object storage using a provider-issued POST policy.
#[derive(Clone)]
pub struct SignedUploadClient {
    client: Client,
}

impl SignedUploadClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn upload(
        &self,
        audio: &AudioFile,
        policy: &UploadPolicy,
    ) -> Result<StorageLocator, TranscriptionError> {
        let key = object_key(
            policy.directory(),
            audio.extension(),
            Utc::now().timestamp_millis(),
            &random_id(),
        );
        let upload_url = policy.upload_url();

        let boundary = multipart_encoder::generate_boundary();
        let body = multipart_encoder::encode(&policy_form_fields(policy, &key, audio), &boundary);

        tracing::debug!(
            upload_url = %upload_url,
            key = %key,
            bytes = body.len(),
            "Uploading audio to object storage"
        );

        let response = self
            .client
            .post(&upload_url)
            .header(CONTENT_TYPE, multipart_encoder::content_type_header(&boundary))
            .body(body)
            .send()
            .await
            .map_err(|e| map_send_error("object storage upload", e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = read_error_body(response).await;
            return Err(TranscriptionError::UploadFailed { status, body });
        }

        let locator = StorageLocator::from_key(&key);
        tracing::info!(locator = %locator, "Audio uploaded to object storage");

        Ok(locator)
    }
}

/// `{dir}/{timestamp}_{id}.{ext}`, without the directory part when the
/// policy has none.
pub fn object_key(directory: &str, extension: &str, timestamp_ms: i64, random_id: &str) -> String {
    let directory = directory.trim_end_matches('/');
    if directory.is_empty() {
        format!("{}_{}.{}", timestamp_ms, random_id, extension)
    } else {
        format!("{}/{}_{}.{}", directory, timestamp_ms, random_id, extension)
    }
}

/// Field order is part of the signature check on the storage side.
pub fn policy_form_fields<'a>(
    policy: &'a UploadPolicy,
    key: &'a str,
    audio: &'a AudioFile,
) -> Vec<FormField<'a>> {
    let mut fields = vec![
        FormField::text("OSSAccessKeyId", &policy.access_key_id),
        FormField::text("policy", &policy.policy_token),
        FormField::text("Signature", &policy.signature),
        FormField::text("key", key),
    ];

    let optional = [
        ("x-oss-object-acl", policy.acl.as_deref()),
        ("x-oss-forbid-overwrite", policy.forbid_overwrite.as_deref()),
        ("x-oss-security-token", policy.security_token.as_deref()),
    ];
    for (name, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            fields.push(FormField::text(name, value));
        }
    }

    fields.push(FormField::text("success_action_status", SUCCESS_ACTION_STATUS));
    fields.push(FormField::file(
        "file",
        &audio.filename,
        &audio.mime_type,
        &audio.data,
    ));

    fields
}

fn random_id() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}
