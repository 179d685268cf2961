//! HTTP collaborator used to download watch pages and timed-text tracks.

use crate::config::FetchConfig;
use crate::error::{Result, TranscriptError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::{debug, trace};

/// Fetches a document by URL and returns its body as text.
/// Implementations must not retry; failures go straight back to the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`PageFetcher`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the user agent, language and timeout from `config`.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| TranscriptError::InvalidConfig(format!("accept language: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, language);
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranscriptError::InvalidConfig(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        trace!("HttpFetcher::fetch(url={url})");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranscriptError::transport(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TranscriptError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp
            .text()
            .await
            .map_err(|e| TranscriptError::transport(url, e))?;
        debug!("fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}
