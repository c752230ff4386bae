use crate::config::ScraperConfig;
use crate::scraper::PageFetcher;
use crate::scraper::error::ScrapeError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Plain HTTP fetcher. One GET per call, no retry.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            // Accept cookies so session-based pages work
            .cookie_store(true)
            .build()?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let resp = self.inner.get(url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            warn!("{} → HTTP {}", url, status);
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        debug!("{} → {} ({} bytes)", url, status, body.len());
        Ok(body)
    }
}
