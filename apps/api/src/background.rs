//! Background image source.
//!
//! The renderer only needs raw image bytes. Fetching sits behind a trait so the
//! HTTP handlers can be exercised without network access.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("Invalid background URL: {0}")]
    InvalidUrl(String),

    #[error("Background request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Background server returned status {0}")]
    Status(u16),

    #[error("Background image exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// Where background images come from.
#[async_trait]
pub trait BackgroundSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, BackgroundError>;
}

/// Fetches backgrounds over HTTP(S) with a timeout and a size cap.
#[derive(Clone)]
pub struct HttpBackgroundSource {
    client: Client,
    max_bytes: usize,
}

impl HttpBackgroundSource {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build background HTTP client")?;
        Ok(Self { client, max_bytes })
    }
}

#[async_trait]
impl BackgroundSource for HttpBackgroundSource {
    async fn fetch(&self, url: &str) -> Result<Bytes, BackgroundError> {
        let url = parse_background_url(url)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackgroundError::Status(status.as_u16()));
        }
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(BackgroundError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let body = response.bytes().await?;
        if body.len() > self.max_bytes {
            return Err(BackgroundError::TooLarge {
                limit: self.max_bytes,
            });
        }

        debug!(%url, bytes = body.len(), "Background fetched");
        Ok(body)
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn parse_background_url(raw: &str) -> Result<Url, BackgroundError> {
    let url = Url::parse(raw).map_err(|e| BackgroundError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BackgroundError::InvalidUrl(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_background_url_accepts_http() {
        let url = parse_background_url("https://example.com/bg.png").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_parse_background_url_rejects_other_schemes() {
        for raw in ["file:///etc/passwd", "ftp://example.com/bg.png", "not a url"] {
            assert!(
                matches!(parse_background_url(raw), Err(BackgroundError::InvalidUrl(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url_before_network() {
        let source = HttpBackgroundSource::new(Duration::from_secs(1), 1024).unwrap();
        let err = source.fetch("file:///tmp/bg.png").await.unwrap_err();
        assert!(matches!(err, BackgroundError::InvalidUrl(_)));
    }
}
