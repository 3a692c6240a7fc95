use std::time::Duration;

use reqwest::{Client, Response};

use crate::application::ports::TranscriptionError;

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(60);
const SNIPPET_CHARS: usize = 200;

/// One client shared by every backend; reqwest pools connections per host.
pub fn build_http_client(timeout: Duration) -> Result<Client, TranscriptionError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TranscriptionError::Internal(format!("http client: {}", e)))
}

pub fn map_send_error(context: &str, error: reqwest::Error) -> TranscriptionError {
    if error.is_timeout() {
        TranscriptionError::Timeout(format!("{}: {}", context, error))
    } else {
        TranscriptionError::Transport(format!("{}: {}", context, error))
    }
}

pub async fn read_error_body(response: Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string())
}

/// First characters of a body for diagnostics. Cuts on a char boundary.
pub fn body_snippet(body: &str) -> String {
    let mut chars = body.chars();
    let snippet: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", snippet)
    } else {
        snippet
    }
}
