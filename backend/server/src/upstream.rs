//! # Upstream
//!
//! The hosted AI service that actually writes the recommendation.
//!
//! The relay does not look inside the payload in either direction. The
//! request body goes out as received and the response bytes come back
//! untouched, with one exception: a success response that is not JSON is
//! treated as a failure, since the browser expects JSON from this route.
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::de::IgnoredAny;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status code {0}")]
    Status(u16),

    #[error("Upstream returned invalid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// Sends the JSON `body` as received and returns the raw JSON answer.
    async fn forward(&self, body: Bytes) -> Result<Bytes, UpstreamError>;
}

pub struct HttpUpstream {
    client: Client,
    url: String,
}

impl HttpUpstream {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn forward(&self, body: Bytes) -> Result<Bytes, UpstreamError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Upstream answered {status}: {text}");

            return Err(UpstreamError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<IgnoredAny>(&bytes)?;

        debug!("Upstream returned {} bytes", bytes.len());
        Ok(bytes)
    }
}
