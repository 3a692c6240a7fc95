use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::ports::TranscriptionError;
use crate::domain::Transcription;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::request_parser::RequestBodyParser;
use crate::presentation::state::AppState;

use super::error_response::ApiError;

#[tracing::instrument(skip(state, request))]
pub async fn transcriptions_handler(State(state): State<AppState>, request: Request) -> Response {
    match transcribe(&state, request).await {
        Ok(transcription) => (StatusCode::OK, Json(transcription)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Parses the transport body and runs it through the transcription service.
/// Shared by the router and the edge entry point.
pub async fn transcribe(
    state: &AppState,
    request: Request,
) -> Result<Transcription, TranscriptionError> {
    let parser = RequestBodyParser::from_headers(request.headers());
    let canonical = parser.parse(request).await.inspect_err(|e| {
        tracing::warn!(parser = ?parser, error = %e, "Rejected transcription request");
    })?;

    tracing::debug!(
        parser = ?parser,
        filename = %canonical.audio.filename,
        model = canonical.model.name().unwrap_or("[default]"),
        prompt = %sanitize_prompt(&canonical.prompt),
        "Transcription request parsed"
    );

    state.transcription_service.transcribe(&canonical).await
}
