use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use serde_json::json;

use asr_gateway::application::ports::TranscriptionError;
use asr_gateway::domain::AuthScheme;
use asr_gateway::infrastructure::http::FormField;
use asr_gateway::infrastructure::http::multipart_encoder::{content_type_header, encode};
use asr_gateway::presentation::request_parser::{RequestBodyParser, bearer_token, decode_audio};

fn json_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/audio/transcriptions")
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, "Bearer dash-key")
        .header(HOST, "gateway.local:8888")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(fields: &[FormField<'_>]) -> Request<Body> {
    let boundary = "TestBoundary";
    Request::builder()
        .method("POST")
        .uri("/v1/audio/transcriptions")
        .header(CONTENT_TYPE, content_type_header(boundary))
        .body(Body::from(encode(fields, boundary)))
        .unwrap()
}

#[test]
fn given_content_types_when_choosing_parser_then_json_only_for_json() {
    assert_eq!(
        RequestBodyParser::from_content_type(Some("application/json; charset=utf-8")),
        RequestBodyParser::JsonBody
    );
    assert_eq!(
        RequestBodyParser::from_content_type(Some("multipart/form-data; boundary=x")),
        RequestBodyParser::MultipartBody
    );
    assert_eq!(
        RequestBodyParser::from_content_type(None),
        RequestBodyParser::MultipartBody
    );
}

#[test]
fn given_authorization_header_when_extracting_bearer_then_returns_token() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, "Bearer  sk-1 ".parse().unwrap());
    assert_eq!(bearer_token(&headers).as_deref(), Some("sk-1"));

    headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
    assert_eq!(bearer_token(&headers), None);
}

#[test]
fn given_data_uri_when_decoding_audio_then_prefix_and_whitespace_are_ignored() {
    assert_eq!(
        decode_audio("data:audio/wav;base64,aGVs\nbG8=").unwrap(),
        b"hello"
    );
    assert_eq!(decode_audio("aGVsbG8=").unwrap(), b"hello");
}

#[test]
fn given_invalid_base64_when_decoding_audio_then_invalid_audio_encoding() {
    assert!(matches!(
        decode_audio("!!!not base64"),
        Err(TranscriptionError::InvalidAudioEncoding(_))
    ));
}

#[tokio::test]
async fn given_json_body_with_object_audio_when_parsing_then_builds_canonical_request() {
    let request = json_request(json!({
        "audio_file": {"data": "aGVsbG8=", "name": "clip.mp3", "type": "audio/mpeg"},
        "language": "en",
        "context": "names: Ada",
        "model": "qwen3-asr-flash:itn",
        "upstream_url": "relay.example.com"
    }));

    let canonical = RequestBodyParser::JsonBody.parse(request).await.unwrap();

    assert_eq!(&canonical.audio.data[..], b"hello");
    assert_eq!(canonical.audio.filename, "clip.mp3");
    assert_eq!(canonical.audio.mime_type, "audio/mpeg");
    assert_eq!(canonical.language, "en");
    assert_eq!(canonical.prompt, "names: Ada");
    assert_eq!(canonical.model.name(), Some("qwen3-asr-flash"));
    assert!(canonical.model.enable_itn());
    assert_eq!(canonical.credential(), Some("dash-key"));
    assert_eq!(canonical.upstream_url(), Some("relay.example.com"));
    assert_eq!(canonical.origin_host.as_deref(), Some("gateway.local:8888"));
}

#[tokio::test]
async fn given_json_body_with_string_audio_when_parsing_then_uses_default_name() {
    let request = json_request(json!({"audio_file": "aGVsbG8="}));

    let canonical = RequestBodyParser::JsonBody.parse(request).await.unwrap();

    assert_eq!(canonical.audio.filename, "audio.wav");
    assert_eq!(canonical.audio.mime_type, "audio/wav");
    assert_eq!(canonical.language, "auto");
}

#[tokio::test]
async fn given_json_body_without_audio_when_parsing_then_missing_file() {
    let request = json_request(json!({"language": "en"}));

    let result = RequestBodyParser::JsonBody.parse(request).await;

    assert!(matches!(result, Err(TranscriptionError::MissingFile)));
}

#[tokio::test]
async fn given_malformed_json_when_parsing_then_invalid_request_body() {
    let request = Request::builder()
        .method("POST")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let result = RequestBodyParser::JsonBody.parse(request).await;

    assert!(matches!(result, Err(TranscriptionError::InvalidRequestBody(_))));
}

#[tokio::test]
async fn given_multipart_form_when_parsing_then_reads_all_known_fields() {
    let request = multipart_request(&[
        FormField::file("file", "a.webm", "audio/webm", b"bytes"),
        FormField::text("language", "ja"),
        FormField::text("prompt", "hint"),
        FormField::text("model", "whisper-large"),
        FormField::text("upstream_url", "https://proxy.example.com/v1"),
        FormField::text("custom_key", "sk-custom"),
        FormField::text("custom_header", "X-API-Key"),
        FormField::text("unrelated", "ignored"),
    ]);

    let canonical = RequestBodyParser::MultipartBody.parse(request).await.unwrap();

    assert_eq!(canonical.audio.filename, "a.webm");
    assert_eq!(canonical.audio.mime_type, "audio/webm");
    assert_eq!(canonical.language, "ja");
    assert_eq!(canonical.prompt, "hint");
    assert_eq!(canonical.model.name(), Some("whisper-large"));
    assert_eq!(canonical.custom_auth.key, "sk-custom");
    assert_eq!(canonical.custom_auth.scheme, Some(AuthScheme::XApiKey));
    assert_eq!(canonical.credential(), None);
}

#[tokio::test]
async fn given_multipart_file_without_filename_when_parsing_then_missing_file() {
    let request = multipart_request(&[
        FormField::text("file", "not a file"),
        FormField::text("language", "en"),
    ]);

    let result = RequestBodyParser::MultipartBody.parse(request).await;

    assert!(matches!(result, Err(TranscriptionError::MissingFile)));
}

#[tokio::test]
async fn given_unknown_custom_header_when_parsing_then_invalid_request_body() {
    let request = multipart_request(&[
        FormField::file("file", "a.wav", "audio/wav", b"x"),
        FormField::text("custom_header", "Cookie"),
    ]);

    let result = RequestBodyParser::MultipartBody.parse(request).await;

    assert!(matches!(result, Err(TranscriptionError::InvalidRequestBody(_))));
}
