mod client;
pub mod multipart_encoder;
mod upstream_url;

pub use client::{
    DEFAULT_UPSTREAM_TIMEOUT, body_snippet, build_http_client, map_send_error, read_error_body,
};
pub use multipart_encoder::FormField;
pub use upstream_url::UpstreamTarget;
