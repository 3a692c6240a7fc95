use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::infrastructure::asr::{
    DEFAULT_DASHSCOPE_BASE_URL, DEFAULT_DASHSCOPE_MODEL, DEFAULT_PROXY_MODEL,
    DEFAULT_RELAY_LANGUAGE,
};
use crate::infrastructure::http::DEFAULT_UPSTREAM_TIMEOUT;
use crate::infrastructure::observability::TracingConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8888;
const DEFAULT_MAX_UPLOAD_MB: usize = 100;

/// Legacy variable carrying the default relay endpoint.
pub const UPSTREAM_ASR_ENDPOINT_VAR: &str = "UPSTREAM_ASR_ENDPOINT";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub http: HttpSettings,
    pub dashscope: DashScopeSettings,
    pub relay: RelaySettings,
    pub proxy: ProxySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
    #[serde(default)]
    pub mode: ServerMode,
}

/// Which transport adapter the binary serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    #[default]
    Router,
    Edge,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashScopeSettings {
    pub base_url: String,
    pub default_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    #[serde(default)]
    pub default_endpoint: Option<String>,
    pub default_language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxySettings {
    pub default_model: String,
    pub fallback_language: String,
    #[serde(default)]
    pub blocked_host_fragments: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Applied to every target when set; otherwise the crate filter is used.
    #[serde(default)]
    pub level: Option<String>,
    pub json: bool,
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl LoggingSettings {
    /// `LOG_FORMAT=json` switches JSON output on; any other value leaves the setting as is.
    pub fn apply_log_format(&mut self, log_format: Option<&str>) {
        if log_format.is_some_and(|v| v.trim().eq_ignore_ascii_case("json")) {
            self.json = true;
        }
    }

    pub fn tracing_config(&self, environment: &str) -> TracingConfig {
        TracingConfig::new(environment, self.json, self.level.as_deref())
    }
}

impl RelaySettings {
    pub fn has_default_endpoint(&self) -> bool {
        self.default_endpoint
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty())
    }
}

impl Settings {
    /// Layers built-in defaults, the optional `appsettings.{env}` file and
    /// `APP_`-prefixed variables (`APP_SERVER__PORT=9000`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.max_upload_mb", DEFAULT_MAX_UPLOAD_MB as i64)?
            .set_default("server.mode", "router")?
            .set_default("http.timeout_secs", DEFAULT_UPSTREAM_TIMEOUT.as_secs() as i64)?
            .set_default("dashscope.base_url", DEFAULT_DASHSCOPE_BASE_URL)?
            .set_default("dashscope.default_model", DEFAULT_DASHSCOPE_MODEL)?
            .set_default("relay.default_language", DEFAULT_RELAY_LANGUAGE)?
            .set_default("proxy.default_model", DEFAULT_PROXY_MODEL)?
            .set_default("proxy.fallback_language", DEFAULT_RELAY_LANGUAGE)?
            .set_default("proxy.blocked_host_fragments", Vec::<String>::new())?
            .set_default("logging.json", false)?
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("proxy.blocked_host_fragments")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;

        if !settings.relay.has_default_endpoint() {
            settings.relay.default_endpoint = std::env::var(UPSTREAM_ASR_ENDPOINT_VAR)
                .ok()
                .filter(|v| !v.trim().is_empty());
        }

        settings
            .logging
            .apply_log_format(std::env::var(LOG_FORMAT_VAR).ok().as_deref());

        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
                mode: ServerMode::Router,
            },
            http: HttpSettings {
                timeout_secs: DEFAULT_UPSTREAM_TIMEOUT.as_secs(),
            },
            dashscope: DashScopeSettings {
                base_url: DEFAULT_DASHSCOPE_BASE_URL.to_string(),
                default_model: DEFAULT_DASHSCOPE_MODEL.to_string(),
            },
            relay: RelaySettings {
                default_endpoint: None,
                default_language: DEFAULT_RELAY_LANGUAGE.to_string(),
            },
            proxy: ProxySettings {
                default_model: DEFAULT_PROXY_MODEL.to_string(),
                fallback_language: DEFAULT_RELAY_LANGUAGE.to_string(),
                blocked_host_fragments: Vec::new(),
            },
            logging: LoggingSettings {
                level: None,
                json: false,
            },
        }
    }
}
