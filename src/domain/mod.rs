mod audio_file;
mod custom_auth;
mod model_spec;
mod transcription;
mod transcription_request;
mod upload_policy;

pub use audio_file::{AudioFile, DEFAULT_AUDIO_EXTENSION, DEFAULT_AUDIO_MIME};
pub use custom_auth::{AuthScheme, CustomAuth};
pub use model_spec::ModelSpec;
pub use transcription::Transcription;
pub use transcription_request::{AUTO_LANGUAGE, TranscriptionRequest};
pub use upload_policy::{StorageLocator, UploadPolicy};
