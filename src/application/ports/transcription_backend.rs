use std::fmt;

use async_trait::async_trait;

use crate::domain::{Transcription, TranscriptionRequest};

/// Common contract implemented by every speech recognition backend.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Upstream,
    Format,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("missing or invalid file field")]
    MissingFile,
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),
    #[error("failed to decode base64 audio data: {0}")]
    InvalidAudioEncoding(String),
    #[error(
        "no service configured: provide an Authorization Bearer token, an upstream_url, or custom_key/custom_header"
    )]
    NoServiceConfigured,
    #[error("upstream URL required")]
    UpstreamRequired,
    #[error("invalid upstream URL: {0}")]
    InvalidUpstreamUrl(String),
    #[error("upstream URL points back at this service: {0}")]
    SelfReferentialUpstream(String),
    #[error("upload policy request failed with status {status}: {body}")]
    PolicyFetchFailed { status: u16, body: String },
    #[error("invalid upload policy response: {0}")]
    InvalidPolicyResponse(String),
    #[error("object storage upload failed with status {status}: {body}")]
    UploadFailed { status: u16, body: String },
    #[error("ASR request failed with status {status}: {body}")]
    AsrFailed { status: u16, body: String },
    #[error("relay request failed with status {status}: {body}")]
    RelayFailed { status: u16, body: String },
    #[error("custom proxy request failed with status {status}: {body}")]
    CustomProxyFailed {
        status: u16,
        body: String,
        hints: Vec<String>,
    },
    #[error("upstream request failed: {0}")]
    Transport(String),
    #[error("upstream request timed out: {0}")]
    Timeout(String),
    #[error("invalid response format: {snippet}")]
    InvalidResponseFormat { snippet: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl TranscriptionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingFile
            | Self::InvalidRequestBody(_)
            | Self::InvalidAudioEncoding(_)
            | Self::NoServiceConfigured
            | Self::UpstreamRequired
            | Self::InvalidUpstreamUrl(_)
            | Self::SelfReferentialUpstream(_) => ErrorCategory::Validation,
            Self::PolicyFetchFailed { .. }
            | Self::InvalidPolicyResponse(_)
            | Self::UploadFailed { .. }
            | Self::AsrFailed { .. }
            | Self::RelayFailed { .. }
            | Self::CustomProxyFailed { .. }
            | Self::Transport(_)
            | Self::Timeout(_) => ErrorCategory::Upstream,
            Self::InvalidResponseFormat { .. } => ErrorCategory::Format,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status reported by the upstream provider, when one was received.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::PolicyFetchFailed { status, .. }
            | Self::UploadFailed { status, .. }
            | Self::AsrFailed { status, .. }
            | Self::RelayFailed { status, .. }
            | Self::CustomProxyFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-friendly label, used as the `error` field of API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing or invalid file field",
            Self::InvalidRequestBody(_) => "failed to parse request",
            Self::InvalidAudioEncoding(_) => "failed to decode base64 audio data",
            Self::NoServiceConfigured => "no service configured",
            Self::UpstreamRequired => "upstream URL required",
            Self::InvalidUpstreamUrl(_) | Self::SelfReferentialUpstream(_) => {
                "invalid upstream URL"
            }
            Self::PolicyFetchFailed { .. } => "getPolicy failed",
            Self::InvalidPolicyResponse(_) => "invalid policy response",
            Self::UploadFailed { .. } => "OSS upload failed",
            Self::AsrFailed { .. } => "ASR failed",
            Self::RelayFailed { .. } => "relay request failed",
            Self::CustomProxyFailed { .. } => "custom proxy request failed",
            Self::Transport(_) => "upstream request failed",
            Self::Timeout(_) => "upstream request timed out",
            Self::InvalidResponseFormat { .. } => "invalid response format",
            Self::Internal(_) => "internal server error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Upstream => "upstream",
            ErrorCategory::Format => "format",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(label)
    }
}
