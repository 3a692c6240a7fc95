mod debug;
mod error_response;
mod health;
mod transcription;

pub use debug::{DebugResponse, debug_handler};
pub use error_response::{ApiError, ErrorDebug, ErrorResponse};
pub use health::health_handler;
pub use transcription::{transcribe, transcriptions_handler};
