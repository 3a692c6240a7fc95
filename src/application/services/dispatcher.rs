use std::fmt;

use crate::application::ports::TranscriptionError;
use crate::domain::TranscriptionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    CustomProxy,
    DirectAsr,
    Relay,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::CustomProxy => "custom_proxy",
            BackendKind::DirectAsr => "direct_asr",
            BackendKind::Relay => "relay",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Picks exactly one backend from the credentials and targets on a request.
///
/// Precedence, first match wins:
/// 1. custom auth key or an explicit header scheme other than `none`
/// 2. bearer credential
/// 3. upstream URL, or a configured default relay endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    relay_default_configured: bool,
}

impl Dispatcher {
    pub fn new(relay_default_configured: bool) -> Self {
        Self {
            relay_default_configured,
        }
    }

    pub fn select(&self, request: &TranscriptionRequest) -> Result<BackendKind, TranscriptionError> {
        if !request.audio.has_valid_name() {
            return Err(TranscriptionError::MissingFile);
        }

        if request.custom_auth.is_requested() {
            return Ok(BackendKind::CustomProxy);
        }

        if request.credential().is_some() {
            return Ok(BackendKind::DirectAsr);
        }

        if request.upstream_url().is_some() || self.relay_default_configured {
            return Ok(BackendKind::Relay);
        }

        Err(TranscriptionError::NoServiceConfigured)
    }
}
