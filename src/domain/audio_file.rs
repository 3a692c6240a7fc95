use bytes::Bytes;

pub const DEFAULT_AUDIO_MIME: &str = "audio/wav";
pub const DEFAULT_AUDIO_EXTENSION: &str = "wav";

/// Uploaded audio payload as received from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub data: Bytes,
    pub filename: String,
    pub mime_type: String,
}

impl AudioFile {
    pub fn new(data: impl Into<Bytes>, filename: impl Into<String>, mime_type: Option<&str>) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            mime_type: normalize_mime(mime_type),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn has_valid_name(&self) -> bool {
        !self.filename.trim().is_empty()
    }

    /// Substring after the last `.` of the filename, `wav` when there is none.
    pub fn extension(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => DEFAULT_AUDIO_EXTENSION,
        }
    }
}

fn normalize_mime(mime_type: Option<&str>) -> String {
    match mime_type.map(str::trim) {
        None | Some("") | Some("application/octet-stream") => DEFAULT_AUDIO_MIME.to_string(),
        // Ends up verbatim in outbound part headers.
        Some(m) if m.chars().any(char::is_control) => DEFAULT_AUDIO_MIME.to_string(),
        Some(m) => m.to_string(),
    }
}
