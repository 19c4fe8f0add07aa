//! Font retrieval for OpenGraph rendering.
//!
//! The card font is an asset of the site itself. When serving, it is fetched
//! over HTTP relative to the request origin; static builds read it from the
//! public directory. A failed retrieval fails the card; there is no fallback
//! font.

use std::{path::PathBuf, sync::Arc};

use thiserror::Error;
use tracing::debug;

/// Font retrieval errors.
#[derive(Debug, Error)]
pub enum FontError {
    /// Transport-level failure.
    #[error("failed to fetch font from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The origin answered with a non-success status.
    #[error("font request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Reading a local font file failed.
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for font retrieval.
pub type Result<T> = std::result::Result<T, FontError>;

/// Where the card font comes from.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// `GET {origin}{path}`.
    Http {
        client: reqwest::Client,
        path: String,
    },
    /// A file on disk.
    File(PathBuf),
    /// Bytes already in memory.
    Bytes(Arc<[u8]>),
}

impl FontSource {
    /// Fetch `path` relative to whichever origin is passed to [`load`](Self::load).
    pub fn http(path: impl Into<String>) -> Self {
        Self::Http {
            client: reqwest::Client::new(),
            path: path.into(),
        }
    }

    /// Load the font.
    ///
    /// `origin` is only used by [`FontSource::Http`].
    pub async fn load(&self, origin: &str) -> Result<Arc<[u8]>> {
        match self {
            Self::Http { client, path } => {
                let url = font_url(origin, path);
                debug!(%url, "fetching font");

                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|source| FontError::Fetch {
                        url: url.clone(),
                        source,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FontError::Status {
                        url,
                        status: status.as_u16(),
                    });
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|source| FontError::Fetch {
                        url: url.clone(),
                        source,
                    })?;
                Ok(Arc::from(bytes.as_ref()))
            }
            Self::File(path) => {
                debug!(path = %path.display(), "reading font");
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| FontError::Io {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Arc::from(bytes))
            }
            Self::Bytes(bytes) => Ok(Arc::clone(bytes)),
        }
    }
}

fn font_url(origin: &str, path: &str) -> String {
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
