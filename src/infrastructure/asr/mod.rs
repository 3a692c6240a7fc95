mod audio_envelope;
mod backend_factory;
mod custom_proxy_backend;
mod dashscope_backend;
mod dashscope_types;
mod relay_backend;
pub mod response_normalizer;
mod signed_upload_client;

pub use audio_envelope::{AudioEnvelope, EnvelopeAudio};
pub use backend_factory::TranscriptionServiceFactory;
pub use custom_proxy_backend::{
    CustomProxyBackend, DEFAULT_PROXY_MODEL, ProxyAttempt, remediation_hints,
};
pub use dashscope_backend::{DEFAULT_DASHSCOPE_BASE_URL, DEFAULT_DASHSCOPE_MODEL, DashScopeBackend};
pub use dashscope_types::GenerationRequest;
pub use relay_backend::{DEFAULT_RELAY_LANGUAGE, RelayBackend};
pub use signed_upload_client::{SignedUploadClient, object_key, policy_form_fields};
