use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use asr_gateway::application::ports::TranscriptionError;
use asr_gateway::presentation::handlers::ApiError;

#[test]
fn given_errors_by_category_when_mapping_then_status_codes_follow() {
    assert_eq!(
        ApiError(TranscriptionError::MissingFile).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ApiError(TranscriptionError::NoServiceConfigured).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ApiError(TranscriptionError::RelayFailed {
            status: 500,
            body: String::new()
        })
        .status(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        ApiError(TranscriptionError::InvalidResponseFormat {
            snippet: String::new()
        })
        .status(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        ApiError(TranscriptionError::Timeout("slow".into())).status(),
        StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
        ApiError(TranscriptionError::Internal("bug".into())).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn given_proxy_failure_when_rendered_then_body_carries_debug_hints() {
    let error = TranscriptionError::CustomProxyFailed {
        status: 405,
        body: "Method Not Allowed".into(),
        hints: vec!["try adding the path /transcribe".into()],
    };

    let response = ApiError(error).into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "custom proxy request failed");
    assert!(json["detail"].as_str().unwrap().contains("405"));
    assert_eq!(json["debug"]["category"], "upstream");
    assert_eq!(json["debug"]["upstream_status"], 405);
    assert_eq!(json["debug"]["hints"][0], "try adding the path /transcribe");
}

#[tokio::test]
async fn given_validation_error_when_rendered_then_body_has_no_debug_block() {
    let response = ApiError(TranscriptionError::MissingFile).into_response();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "missing or invalid file field");
    assert!(json.get("debug").is_none());
}
