mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DashScopeSettings, HttpSettings, LoggingSettings, ProxySettings, RelaySettings, ServerMode,
    ServerSettings, Settings, LOG_FORMAT_VAR, UPSTREAM_ASR_ENDPOINT_VAR,
};
