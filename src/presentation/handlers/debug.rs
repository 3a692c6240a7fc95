use axum::Json;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
pub struct DebugResponse {
    pub message: String,
    pub timestamp: String,
    pub pathname: String,
    pub method: String,
    pub status: String,
}

impl DebugResponse {
    pub fn for_request(request: &Request) -> Self {
        Self {
            message: "asr-gateway debug info".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            pathname: request.uri().path().to_string(),
            method: request.method().to_string(),
            status: "running".to_string(),
        }
    }
}

pub async fn debug_handler(request: Request) -> impl IntoResponse {
    (StatusCode::OK, Json(DebugResponse::for_request(&request)))
}
