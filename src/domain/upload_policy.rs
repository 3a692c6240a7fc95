use std::fmt;

use serde::{Deserialize, Deserializer};

/// Short-lived object storage upload policy issued by the ASR provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadPolicy {
    #[serde(default)]
    pub upload_host: String,
    #[serde(rename = "upload_dir", default)]
    pub upload_directory: String,
    #[serde(rename = "oss_access_key_id", default)]
    pub access_key_id: String,
    #[serde(rename = "policy", default)]
    pub policy_token: String,
    #[serde(default)]
    pub signature: String,
    #[serde(rename = "x_oss_object_acl", default, deserialize_with = "scalar_as_string")]
    pub acl: Option<String>,
    #[serde(
        rename = "x_oss_forbid_overwrite",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub forbid_overwrite: Option<String>,
    #[serde(
        rename = "x_oss_security_token",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub security_token: Option<String>,
}

impl UploadPolicy {
    /// Upload endpoint with an `https://` scheme added when the provider omitted one.
    pub fn upload_url(&self) -> String {
        let host = self.upload_host.trim();
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    pub fn directory(&self) -> &str {
        self.upload_directory.trim_end_matches('/')
    }
}

// The provider sends some flags as JSON booleans and others as strings;
// the upload form needs them as text either way.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Bool(true)) => Some("true".to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Reference to an uploaded object, passed to inference instead of raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocator(String);

impl StorageLocator {
    pub fn from_key(key: &str) -> Self {
        Self(format!("oss://{}", key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
