//! Image references and base64 embedding.

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use tracing::warn;
use ureq::Agent;

use crate::format;

/// Largest image that will be embedded.
const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Download timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Error while turning an image URL into a data URI.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// HTTP request failed (network error, timeout, body too large).
    #[error("image download failed")]
    HttpRequest(#[from] ureq::Error),

    /// Server answered with an error status.
    #[error("image download returned HTTP {0}")]
    HttpStatus(u16),
}

/// Converts an image URL into an embeddable `data:` URI.
pub trait ImageEncoder: Send + Sync {
    /// Return `data:<mime>;base64,<payload>` for the image at `url`.
    fn data_uri(&self, url: &str) -> Result<String, EmbedError>;
}

/// [`ImageEncoder`] that downloads images over HTTP.
pub struct HttpImageEncoder {
    agent: Agent,
}

impl HttpImageEncoder {
    #[must_use]
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpImageEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageEncoder for HttpImageEncoder {
    fn data_uri(&self, url: &str) -> Result<String, EmbedError> {
        let response = self.agent.get(url).call()?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(EmbedError::HttpStatus(status));
        }

        let mime = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| v.starts_with("image/"))
            .map_or_else(|| mime_from_url(url).to_owned(), str::to_owned);

        let data = response
            .into_body()
            .with_config()
            .limit(MAX_IMAGE_BYTES)
            .read_to_vec()?;

        Ok(format!("data:{mime};base64,{}", BASE64_STANDARD.encode(data)))
    }
}

/// Markdown image reference, embedded as a data URI when `encoder` is given.
///
/// A failed embed is logged and falls back to referencing `url` directly, so
/// one broken image does not abort a conversion.
#[must_use]
pub fn image_markdown(alt: &str, url: &str, encoder: Option<&dyn ImageEncoder>) -> String {
    let Some(encoder) = encoder else {
        return format::image(alt, url);
    };

    match encoder.data_uri(url) {
        Ok(data_uri) => format::image(alt, &data_uri),
        Err(e) => {
            warn!(url, error = %e, "Failed to embed image, keeping URL");
            format::image(alt, url)
        }
    }
}

/// Guess an image MIME type from the URL path extension.
fn mime_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "image/png",
    }
}
