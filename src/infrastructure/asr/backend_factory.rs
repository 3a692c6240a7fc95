use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::TranscriptionError;
use crate::application::services::{Dispatcher, TranscriptionService};
use crate::infrastructure::http::build_http_client;
use crate::presentation::config::Settings;

use super::custom_proxy_backend::CustomProxyBackend;
use super::dashscope_backend::DashScopeBackend;
use super::relay_backend::RelayBackend;

pub struct TranscriptionServiceFactory;

impl TranscriptionServiceFactory {
    pub fn create(settings: &Settings) -> Result<TranscriptionService, TranscriptionError> {
        let client = build_http_client(Duration::from_secs(settings.http.timeout_secs))?;

        let direct_asr = DashScopeBackend::new(
            client.clone(),
            &settings.dashscope.base_url,
            &settings.dashscope.default_model,
        );
        let relay = RelayBackend::new(
            client.clone(),
            settings.relay.default_endpoint.clone(),
            &settings.relay.default_language,
        );
        let custom_proxy = CustomProxyBackend::new(
            client,
            &settings.proxy.default_model,
            &settings.proxy.fallback_language,
            settings.proxy.blocked_host_fragments.clone(),
        );

        let dispatcher = Dispatcher::new(settings.relay.has_default_endpoint());

        tracing::debug!(
            dashscope_base_url = %settings.dashscope.base_url,
            relay_default = settings.relay.has_default_endpoint(),
            timeout_secs = settings.http.timeout_secs,
            "Transcription backends configured"
        );

        Ok(TranscriptionService::new(
            dispatcher,
            Arc::new(direct_asr),
            Arc::new(relay),
            Arc::new(custom_proxy),
        ))
    }
}
