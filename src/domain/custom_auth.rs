use std::fmt;
use std::str::FromStr;

/// How the caller-supplied key is presented to a custom proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    Authorization,
    XApiKey,
    None,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Authorization => "Authorization",
            AuthScheme::XApiKey => "X-API-Key",
            AuthScheme::None => "none",
        }
    }
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Authorization" | "authorization" => Ok(AuthScheme::Authorization),
            s if s.eq_ignore_ascii_case("x-api-key") => Ok(AuthScheme::XApiKey),
            s if s.eq_ignore_ascii_case("none") => Ok(AuthScheme::None),
            other => Err(format!("Invalid auth header scheme: {}", other)),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomAuth {
    pub key: String,
    pub scheme: Option<AuthScheme>,
}

impl CustomAuth {
    pub fn new(key: impl Into<String>, scheme: Option<AuthScheme>) -> Self {
        Self {
            key: key.into(),
            scheme,
        }
    }

    /// True when the caller asked for the custom proxy path: a key was given,
    /// or an explicit header scheme other than `none`.
    pub fn is_requested(&self) -> bool {
        !self.key.is_empty() || matches!(self.scheme, Some(s) if s != AuthScheme::None)
    }

    /// Header name and value to attach, if any.
    pub fn header(&self) -> Option<(&'static str, String)> {
        if self.key.is_empty() {
            return None;
        }
        match self.scheme {
            Some(AuthScheme::Authorization) => {
                Some(("Authorization", format!("Bearer {}", self.key)))
            }
            Some(AuthScheme::XApiKey) => Some(("X-API-Key", self.key.clone())),
            Some(AuthScheme::None) | None => None,
        }
    }
}
