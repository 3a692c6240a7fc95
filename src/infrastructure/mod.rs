pub mod asr;
pub mod http;
pub mod observability;
