use axum::extract::{FromRequest, Multipart, Request};
use axum::extract::multipart::Field;

use crate::application::ports::TranscriptionError;
use crate::domain::AudioFile;

use super::RawFields;

pub(super) async fn parse(request: Request) -> Result<RawFields, TranscriptionError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| TranscriptionError::InvalidRequestBody(e.body_text()))?;

    let mut fields = RawFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TranscriptionError::InvalidRequestBody(format!("failed to parse form: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" => fields.audio = read_file(field).await?,
            "language" => fields.language = Some(read_text(field).await?),
            "prompt" => fields.prompt = Some(read_text(field).await?),
            "model" => fields.model = Some(read_text(field).await?),
            "upstream_url" => fields.upstream_url = Some(read_text(field).await?),
            "custom_key" => fields.custom_key = Some(read_text(field).await?),
            "custom_header" => fields.custom_header = Some(read_text(field).await?),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(fields)
}

async fn read_file(field: Field<'_>) -> Result<Option<AudioFile>, TranscriptionError> {
    let Some(filename) = field.file_name().map(str::to_string) else {
        return Ok(None);
    };
    let content_type = field.content_type().map(str::to_string);

    let data = field
        .bytes()
        .await
        .map_err(|e| TranscriptionError::InvalidRequestBody(format!("failed to read file: {}", e)))?;

    Ok(Some(AudioFile::new(data, filename, content_type.as_deref())))
}

async fn read_text(field: Field<'_>) -> Result<String, TranscriptionError> {
    field
        .text()
        .await
        .map_err(|e| TranscriptionError::InvalidRequestBody(format!("failed to read field: {}", e)))
}
