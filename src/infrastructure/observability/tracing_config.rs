const DEFAULT_FILTER: &str = "info,asr_gateway=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Used when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl TracingConfig {
    pub fn new(environment: impl Into<String>, json_format: bool, level: Option<&str>) -> Self {
        let default_filter = match level.map(str::trim) {
            Some(level) if !level.is_empty() => {
                format!("{level},asr_gateway={level},tower_http={level}")
            }
            _ => DEFAULT_FILTER.to_string(),
        };
        Self {
            environment: environment.into(),
            json_format,
            default_filter,
        }
    }
}
