use std::sync::Arc;

use crate::application::ports::{TranscriptionBackend, TranscriptionError};
use crate::domain::{Transcription, TranscriptionRequest};

use super::dispatcher::{BackendKind, Dispatcher};

pub struct TranscriptionService {
    dispatcher: Dispatcher,
    direct_asr: Arc<dyn TranscriptionBackend>,
    relay: Arc<dyn TranscriptionBackend>,
    custom_proxy: Arc<dyn TranscriptionBackend>,
}

impl TranscriptionService {
    pub fn new(
        dispatcher: Dispatcher,
        direct_asr: Arc<dyn TranscriptionBackend>,
        relay: Arc<dyn TranscriptionBackend>,
        custom_proxy: Arc<dyn TranscriptionBackend>,
    ) -> Self {
        Self {
            dispatcher,
            direct_asr,
            relay,
            custom_proxy,
        }
    }

    pub async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError> {
        let kind = self.dispatcher.select(request)?;

        tracing::info!(
            backend = %kind,
            filename = %request.audio.filename,
            bytes = request.audio.size(),
            mime = %request.audio.mime_type,
            language = %request.language,
            itn = request.model.enable_itn(),
            "Dispatching transcription request"
        );

        match self.backend(kind).transcribe(request).await {
            Ok(transcription) => {
                tracing::info!(
                    backend = %kind,
                    chars = transcription.text.chars().count(),
                    "Transcription completed"
                );
                Ok(transcription)
            }
            Err(e) => {
                tracing::warn!(
                    backend = %kind,
                    category = %e.category(),
                    upstream_status = e.upstream_status(),
                    error = %e,
                    "Transcription failed"
                );
                Err(e)
            }
        }
    }

    fn backend(&self, kind: BackendKind) -> &dyn TranscriptionBackend {
        match kind {
            BackendKind::CustomProxy => self.custom_proxy.as_ref(),
            BackendKind::DirectAsr => self.direct_asr.as_ref(),
            BackendKind::Relay => self.relay.as_ref(),
        }
    }
}
