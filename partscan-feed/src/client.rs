use std::time::Duration;

use partscan_core::Catalog;

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::gviz;

/// HTTP client for the spreadsheet feed.
pub struct FeedClient {
    http: reqwest::Client,
    config: FeedConfig,
}

impl FeedClient {
    /// Create a client for a feed. Fails only if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetch and parse the feed into a catalog.
    ///
    /// One attempt, no retry. On failure the caller keeps whatever catalog
    /// it had — normally the empty one.
    pub async fn fetch_catalog(&self) -> Result<Catalog, FeedError> {
        let url = self.config.url();
        log::debug!("fetching part feed from {url}");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let rows = gviz::parse_feed(&body)?;
        let catalog = Catalog::build(rows);
        log::info!("loaded {} part codes from feed", catalog.len());
        Ok(catalog)
    }
}
