use std::fmt;

use reqwest::Url;

use crate::application::ports::TranscriptionError;

/// Caller-supplied proxy target after scheme defaulting and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    raw: String,
    url: Url,
}

impl UpstreamTarget {
    pub fn parse(input: &str) -> Result<Self, TranscriptionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TranscriptionError::UpstreamRequired);
        }

        let lower = trimmed.to_ascii_lowercase();
        let raw = if lower.starts_with("http://") || lower.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&raw)
            .map_err(|e| TranscriptionError::InvalidUpstreamUrl(format!("{}: {}", raw, e)))?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(TranscriptionError::InvalidUpstreamUrl(format!(
                "{}: missing host",
                raw
            )));
        }

        Ok(Self { raw, url })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Rejects targets that would loop back into this service: the host the
    /// request arrived on, or any host containing a blocked fragment.
    pub fn ensure_not_self(
        &self,
        origin_host: Option<&str>,
        blocked_fragments: &[String],
    ) -> Result<(), TranscriptionError> {
        let host = self.host().to_ascii_lowercase();

        if let Some(origin) = origin_host {
            let (origin_name, origin_port) = split_host_port(origin);
            let same_port = match origin_port {
                Some(port) => self.url.port_or_known_default() == Some(port),
                None => true,
            };
            if !origin_name.is_empty() && origin_name.eq_ignore_ascii_case(&host) && same_port {
                return Err(TranscriptionError::SelfReferentialUpstream(self.raw.clone()));
            }
        }

        let blocked = blocked_fragments
            .iter()
            .map(|f| f.trim().to_ascii_lowercase())
            .any(|f| !f.is_empty() && host.contains(&f));
        if blocked {
            return Err(TranscriptionError::SelfReferentialUpstream(self.raw.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_host_port(authority: &str) -> (&str, Option<u16>) {
    let authority = authority.trim();

    if let Some(rest) = authority.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((host, tail)) => (host, tail.strip_prefix(':').and_then(|p| p.parse().ok())),
            None => (authority, None),
        };
    }

    match authority.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => (host, port.parse().ok()),
        _ => (authority, None),
    }
}
