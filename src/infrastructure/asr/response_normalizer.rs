//! Maps each provider's response JSON onto the `{text}` contract.

use serde_json::Value;

use crate::application::ports::TranscriptionError;
use crate::domain::Transcription;
use crate::infrastructure::http::body_snippet;

pub fn parse_json_body(body: &str) -> Result<Value, TranscriptionError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(error = %e, "Upstream returned a non-JSON body");
        TranscriptionError::InvalidResponseFormat {
            snippet: body_snippet(body),
        }
    })
}

/// `{success: true, data: [text, ...]}`. Anything else yields empty text,
/// relays report "nothing recognized" that way.
pub fn from_relay(body: &Value) -> Transcription {
    match relay_text(body) {
        Some(text) => Transcription::new(text),
        None => {
            tracing::warn!(body = %body_snippet(&body.to_string()), "Unexpected relay response shape");
            Transcription::empty()
        }
    }
}

/// OpenAI-style `{text}`, then the relay shape, then the raw body as text.
pub fn from_proxy(body: &Value) -> Transcription {
    if let Some(text) = body.get("text").and_then(Value::as_str).filter(|t| !t.is_empty()) {
        return Transcription::new(text);
    }
    if let Some(text) = relay_text(body) {
        return Transcription::new(text);
    }
    Transcription::new(body.to_string())
}

/// First non-empty `text` among `output.choices[0].message.content` items.
pub fn from_generation(body: &Value) -> Transcription {
    let text = body
        .pointer("/output/choices/0/message/content")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .find(|t| !t.is_empty())
        })
        .unwrap_or_default();

    Transcription::new(text)
}

fn relay_text(body: &Value) -> Option<&str> {
    let succeeded = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !succeeded {
        return None;
    }
    body.get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}
