mod transcription_backend;

pub use transcription_backend::{ErrorCategory, TranscriptionBackend, TranscriptionError};
