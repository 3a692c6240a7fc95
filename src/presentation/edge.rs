//! Edge-function style adapter: a single function receives every request
//! and does its own routing, the way serverless edge runtimes invoke code.

use axum::Json;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::presentation::handlers::{ApiError, DebugResponse, health_handler, transcribe};
use crate::presentation::router::{TRANSCRIPTIONS_PATH, with_common_layers};
use crate::presentation::state::AppState;

/// Answers preflights itself and stamps the allow-origin header on every
/// other response.
pub async fn handle(State(state): State<AppState>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return preflight();
    }

    let mut response = route(&state, request).await;
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

async fn route(state: &AppState, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match path.as_str() {
        "/healthz" | "/v1/audio/healthz" => health_handler().await.into_response(),
        "/v1/audio/debug" => {
            (StatusCode::OK, Json(DebugResponse::for_request(&request))).into_response()
        }
        TRANSCRIPTIONS_PATH if method != Method::POST => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "method must be POST" })),
        )
            .into_response(),
        TRANSCRIPTIONS_PATH => match transcribe(state, request).await {
            Ok(transcription) => (StatusCode::OK, Json(transcription)).into_response(),
            Err(e) => ApiError(e).into_response(),
        },
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response(),
    }
}

/// Hosts [`handle`] as the only route, behind the same layers as the router.
pub fn create_edge_service(state: AppState) -> Router {
    let body_limit = state.settings.server.max_upload_bytes();
    with_common_layers(Router::new().fallback(handle).with_state(state), body_limit)
}

fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
        .into_response()
}
