mod dispatcher;
mod transcription_service;

pub use dispatcher::{BackendKind, Dispatcher};
pub use transcription_service::TranscriptionService;
