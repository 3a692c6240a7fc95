use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{ErrorCategory, TranscriptionError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<ErrorDebug>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDebug {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

/// HTTP rendering of a [`TranscriptionError`].
#[derive(Debug)]
pub struct ApiError(pub TranscriptionError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match (&self.0, self.0.category()) {
            (TranscriptionError::Timeout(_), _) => StatusCode::GATEWAY_TIMEOUT,
            (_, ErrorCategory::Validation) => StatusCode::BAD_REQUEST,
            (_, ErrorCategory::Upstream | ErrorCategory::Format) => StatusCode::BAD_GATEWAY,
            (_, ErrorCategory::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TranscriptionError> for ApiError {
    fn from(error: TranscriptionError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let category = self.0.category();

        if category == ErrorCategory::Internal {
            tracing::error!(error = ?self.0, "Unexpected failure while handling transcription");
        }

        let hints = match &self.0 {
            TranscriptionError::CustomProxyFailed { hints, .. } => hints.clone(),
            _ => Vec::new(),
        };
        let upstream_status = self.0.upstream_status();
        let debug = (upstream_status.is_some() || !hints.is_empty()).then(|| ErrorDebug {
            category: category.to_string(),
            upstream_status,
            hints,
        });

        let body = ErrorResponse {
            error: self.0.kind().to_string(),
            detail: self.0.to_string(),
            debug,
        };

        (status, Json(body)).into_response()
    }
}
