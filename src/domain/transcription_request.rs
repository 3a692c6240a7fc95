use super::audio_file::AudioFile;
use super::custom_auth::CustomAuth;
use super::model_spec::ModelSpec;

pub const AUTO_LANGUAGE: &str = "auto";

/// Canonical transcription request, independent of the transport encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    pub audio: AudioFile,
    pub language: String,
    pub prompt: String,
    pub model: ModelSpec,
    pub credential: Option<String>,
    pub upstream_url: Option<String>,
    pub custom_auth: CustomAuth,
    /// Host the request arrived on, used to refuse proxying back to ourselves.
    pub origin_host: Option<String>,
}

impl TranscriptionRequest {
    pub fn new(audio: AudioFile) -> Self {
        Self {
            audio,
            language: AUTO_LANGUAGE.to_string(),
            prompt: String::new(),
            model: ModelSpec::default(),
            credential: None,
            upstream_url: None,
            custom_auth: CustomAuth::default(),
            origin_host: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = if language.trim().is_empty() {
            AUTO_LANGUAGE.to_string()
        } else {
            language
        };
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_model(mut self, raw: &str) -> Self {
        self.model = ModelSpec::parse(raw);
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = non_empty(credential.into());
        self
    }

    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = non_empty(url.into());
        self
    }

    pub fn with_custom_auth(mut self, custom_auth: CustomAuth) -> Self {
        self.custom_auth = custom_auth;
        self
    }

    pub fn with_origin_host(mut self, host: impl Into<String>) -> Self {
        self.origin_host = non_empty(host.into());
        self
    }

    /// Language to forward, `None` when the provider should auto-detect.
    pub fn language_hint(&self) -> Option<&str> {
        if self.language.eq_ignore_ascii_case(AUTO_LANGUAGE) {
            None
        } else {
            Some(&self.language)
        }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref().filter(|c| !c.is_empty())
    }

    pub fn upstream_url(&self) -> Option<&str> {
        self.upstream_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
