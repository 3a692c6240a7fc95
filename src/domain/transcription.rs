use serde::Serialize;

/// Normalized transcription result returned to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcription {
    pub text: String,
}

impl Transcription {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self::new(String::new())
    }
}
