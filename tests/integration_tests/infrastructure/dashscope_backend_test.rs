use axum::Json;
use axum::Router;
use axum::extract::{Multipart, RawQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::sync::oneshot;

use asr_gateway::application::ports::{TranscriptionBackend, TranscriptionError};
use asr_gateway::domain::{AudioFile, TranscriptionRequest};
use asr_gateway::infrastructure::asr::DashScopeBackend;

use crate::helpers::{Recorder, start_mock_server};

const GENERATION_PATH: &str = "/api/v1/services/aigc/multimodal-generation/generation";
const AUDIO_BYTES: &[u8] = b"ID3\x04\x00fake mp3 payload";

#[derive(Clone)]
enum Reply {
    Default,
    Fixed(u16, &'static str),
}

struct DashScopeMock {
    policy: Reply,
    upload: Reply,
    generation: Reply,
}

impl Default for DashScopeMock {
    fn default() -> Self {
        Self {
            policy: Reply::Default,
            upload: Reply::Default,
            generation: Reply::Default,
        }
    }
}

#[derive(Clone, Default)]
struct Received {
    policy: Recorder<(String, String)>,
    uploads: Recorder<Vec<(String, Vec<u8>)>>,
    generations: Recorder<(String, String, Value)>,
}

fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn valid_policy(upload_host: &str) -> Value {
    json!({
        "request_id": "req-1",
        "data": {
            "policy": "cG9saWN5",
            "signature": "c2lnbmF0dXJl",
            "upload_dir": "dashscope-instant/abc/",
            "upload_host": upload_host,
            "oss_access_key_id": "LTAI-test",
            "x_oss_object_acl": "private",
            "x_oss_forbid_overwrite": "true",
            "expire_in_seconds": 300,
            "max_file_size_mb": 100
        }
    })
}

fn generation_reply() -> Value {
    json!({
        "output": {
            "choices": [{
                "finish_reason": "stop",
                "message": {
                    "role": "assistant",
                    "content": [{"text": "你好世界"}]
                }
            }]
        },
        "usage": {"seconds": 2}
    })
}

fn fixed(status: u16, body: &'static str) -> axum::response::Response {
    (StatusCode::from_u16(status).unwrap(), body).into_response()
}

async fn start_dashscope(mock: DashScopeMock) -> (String, oneshot::Sender<()>, Received) {
    let received = Received::default();
    let rec = received.clone();

    let (base_url, shutdown_tx) = start_mock_server(move |base_url| {
        let upload_host = format!("{}/oss", base_url);

        let policy_rec = rec.policy.clone();
        let policy_reply = mock.policy.clone();
        let policy = get(move |RawQuery(query): RawQuery, headers: HeaderMap| {
            let policy_rec = policy_rec.clone();
            let upload_host = upload_host.clone();
            let reply = policy_reply.clone();
            async move {
                policy_rec.push((query.unwrap_or_default(), header(&headers, "authorization")));
                match reply {
                    Reply::Default => Json(valid_policy(&upload_host)).into_response(),
                    Reply::Fixed(status, body) => fixed(status, body),
                }
            }
        });

        let upload_rec = rec.uploads.clone();
        let upload_reply = mock.upload.clone();
        let upload = post(move |mut multipart: Multipart| {
            let upload_rec = upload_rec.clone();
            let reply = upload_reply.clone();
            async move {
                let mut parts = Vec::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let data = field.bytes().await.unwrap().to_vec();
                    parts.push((name, data));
                }
                upload_rec.push(parts);
                match reply {
                    Reply::Default => StatusCode::OK.into_response(),
                    Reply::Fixed(status, body) => fixed(status, body),
                }
            }
        });

        let generation_rec = rec.generations.clone();
        let generation_reply_kind = mock.generation.clone();
        let generation = post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let generation_rec = generation_rec.clone();
            let reply = generation_reply_kind.clone();
            async move {
                generation_rec.push((
                    header(&headers, "authorization"),
                    header(&headers, "x-dashscope-ossresourceresolve"),
                    body,
                ));
                match reply {
                    Reply::Default => Json(generation_reply()).into_response(),
                    Reply::Fixed(status, body) => fixed(status, body),
                }
            }
        });

        Router::new()
            .route("/api/v1/uploads", policy)
            .route("/oss", upload)
            .route(GENERATION_PATH, generation)
    })
    .await;

    (base_url, shutdown_tx, received)
}

fn request() -> TranscriptionRequest {
    TranscriptionRequest::new(AudioFile::new(
        AUDIO_BYTES.to_vec(),
        "meeting.mp3",
        Some("audio/mpeg"),
    ))
    .with_credential("sk-dash")
}

fn backend(base_url: &str) -> DashScopeBackend {
    DashScopeBackend::new(reqwest::Client::new(), base_url, "qwen3-asr-flash")
}

#[tokio::test]
async fn given_valid_credential_when_transcribing_then_runs_policy_upload_and_generation() {
    let (base_url, shutdown_tx, received) = start_dashscope(DashScopeMock::default()).await;
    let req = request()
        .with_model("qwen3-asr-flash:ITN")
        .with_prompt("speaker names: Ada");

    let result = backend(&base_url).transcribe(&req).await.unwrap();

    assert_eq!(result.text, "你好世界");

    let policy = received.policy.entries();
    assert_eq!(policy.len(), 1);
    assert!(policy[0].0.contains("action=getPolicy"));
    assert!(policy[0].0.contains("model=qwen3-asr-flash"));
    assert_eq!(policy[0].1, "Bearer sk-dash");

    let uploads = received.uploads.entries();
    assert_eq!(uploads.len(), 1);
    let names: Vec<&str> = uploads[0].iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        [
            "OSSAccessKeyId",
            "policy",
            "Signature",
            "key",
            "x-oss-object-acl",
            "x-oss-forbid-overwrite",
            "success_action_status",
            "file"
        ]
    );
    let key = String::from_utf8(uploads[0][3].1.clone()).unwrap();
    assert!(key.starts_with("dashscope-instant/abc/"));
    assert!(key.ends_with(".mp3"));
    assert_eq!(uploads[0][6].1, b"200");
    assert_eq!(uploads[0][7].1, AUDIO_BYTES);

    let generations = received.generations.entries();
    assert_eq!(generations.len(), 1);
    let (auth, resolve, body) = &generations[0];
    assert_eq!(auth, "Bearer sk-dash");
    assert_eq!(resolve, "enable");
    assert_eq!(body["model"], "qwen3-asr-flash");
    assert_eq!(
        body["input"]["messages"][0]["content"][0]["text"],
        "speaker names: Ada"
    );
    assert_eq!(
        body["input"]["messages"][1]["content"][0]["audio"],
        format!("oss://{}", key)
    );
    assert_eq!(body["parameters"]["asr_options"]["enable_itn"], true);
    assert_eq!(body["parameters"]["asr_options"]["enable_lid"], true);
    assert!(body["parameters"]["asr_options"].get("language").is_none());

    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_explicit_language_when_transcribing_then_generation_carries_it() {
    let (base_url, shutdown_tx, received) = start_dashscope(DashScopeMock::default()).await;

    backend(&base_url)
        .transcribe(&request().with_language("en"))
        .await
        .unwrap();

    let generations = received.generations.entries();
    assert_eq!(generations[0].2["parameters"]["asr_options"]["language"], "en");
    assert_eq!(generations[0].2["parameters"]["asr_options"]["enable_itn"], false);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_policy_rejected_when_transcribing_then_fails_before_upload() {
    let (base_url, shutdown_tx, received) = start_dashscope(DashScopeMock {
        policy: Reply::Fixed(401, r#"{"code":"InvalidApiKey"}"#),
        ..Default::default()
    })
    .await;

    let result = backend(&base_url).transcribe(&request()).await;

    match result {
        Err(TranscriptionError::PolicyFetchFailed { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("InvalidApiKey"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(received.uploads.len(), 0);
    assert_eq!(received.generations.len(), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_policy_without_data_when_transcribing_then_invalid_policy_response() {
    let (base_url, shutdown_tx, received) = start_dashscope(DashScopeMock {
        policy: Reply::Fixed(200, r#"{"request_id":"x"}"#),
        ..Default::default()
    })
    .await;

    let result = backend(&base_url).transcribe(&request()).await;

    assert!(matches!(
        result,
        Err(TranscriptionError::InvalidPolicyResponse(_))
    ));
    assert_eq!(received.uploads.len(), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_upload_rejected_when_transcribing_then_generation_is_not_called() {
    let (base_url, shutdown_tx, received) = start_dashscope(DashScopeMock {
        upload: Reply::Fixed(403, "<Error><Code>AccessDenied</Code></Error>"),
        ..Default::default()
    })
    .await;

    let result = backend(&base_url).transcribe(&request()).await;

    match result {
        Err(TranscriptionError::UploadFailed { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("AccessDenied"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(received.generations.len(), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_generation_error_when_transcribing_then_asr_failed_with_provider_body() {
    let (base_url, shutdown_tx, _received) = start_dashscope(DashScopeMock {
        generation: Reply::Fixed(400, r#"{"code":"InvalidParameter"}"#),
        ..Default::default()
    })
    .await;

    let result = backend(&base_url).transcribe(&request()).await;

    match result {
        Err(e @ TranscriptionError::AsrFailed { .. }) => {
            assert_eq!(e.upstream_status(), Some(400));
            assert!(e.to_string().contains("InvalidParameter"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_json_generation_body_when_transcribing_then_invalid_response_format() {
    let (base_url, shutdown_tx, _received) = start_dashscope(DashScopeMock {
        generation: Reply::Fixed(200, "<html>maintenance</html>"),
        ..Default::default()
    })
    .await;

    let result = backend(&base_url).transcribe(&request()).await;

    assert!(matches!(
        result,
        Err(TranscriptionError::InvalidResponseFormat { .. })
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_same_request_twice_when_transcribing_then_results_match_with_fresh_uploads() {
    let (base_url, shutdown_tx, received) = start_dashscope(DashScopeMock::default()).await;
    let req = request();
    let dashscope = backend(&base_url);

    let first = dashscope.transcribe(&req).await.unwrap();
    let second = dashscope.transcribe(&req).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(received.policy.len(), 2);
    assert_eq!(received.generations.len(), 2);

    let uploads = received.uploads.entries();
    assert_eq!(uploads.len(), 2);
    assert_ne!(uploads[0][3].1, uploads[1][3].1);
    shutdown_tx.send(()).ok();
}
