use chrono::Utc;
use uuid::Uuid;

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, Copy)]
pub enum FormField<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

impl<'a> FormField<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        FormField::Text { name, value }
    }

    pub fn file(name: &'a str, filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        FormField::File {
            name,
            filename,
            content_type,
            data,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

/// Fresh boundary per body. Millisecond time plus a random suffix keeps it
/// from colliding with payload bytes.
pub fn generate_boundary() -> String {
    format!(
        "----AsrGatewayBoundary{}{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

pub fn content_type_header(boundary: &str) -> String {
    format!("multipart/form-data; boundary={}", boundary)
}

/// Serializes `fields` in exactly the order given.
///
/// Object storage POST policies verify the signature against the form as
/// sent, so callers rely on this never reordering anything.
pub fn encode(fields: &[FormField<'_>], boundary: &str) -> Vec<u8> {
    let payload_len: usize = fields
        .iter()
        .map(|f| match f {
            FormField::Text { value, .. } => value.len(),
            FormField::File { data, .. } => data.len(),
        })
        .sum();
    let mut body = Vec::with_capacity(payload_len + fields.len() * 128 + boundary.len() + 8);

    for field in fields {
        body.extend_from_slice(b"--");
        body.extend_from_slice(boundary.as_bytes());
        body.extend_from_slice(b"\r\n");

        match field {
            FormField::Text { name, value } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        escape_quoted(name)
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormField::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        escape_quoted(name),
                        escape_quoted(filename),
                        header_value(content_type)
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }

        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(b"--");
    body.extend_from_slice(boundary.as_bytes());
    body.extend_from_slice(b"--\r\n");

    body
}

// Same escaping browsers apply to form-data names and filenames.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn header_value(value: &str) -> String {
    value.chars().filter(|c| !c.is_control()).collect()
}
