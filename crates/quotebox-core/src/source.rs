// Quote source seam - bridges the API client with the quote cache
use async_trait::async_trait;
use quotebox_api::ZenQuotesClient;
use std::time::Duration;

use crate::{config::ApiConfig, models::Quote, Result};

/// Anything that can hand back a batch of quotes
///
/// The cache only ever talks to this trait, so tests can swap the network
/// out for a canned batch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>>;
}

/// ZenQuotes-backed source
pub struct ZenQuotesSource {
    client: ZenQuotesClient,
}

impl ZenQuotesSource {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Ok(Self {
            client: ZenQuotesClient::with_base_url(config.url.clone(), timeout)?,
        })
    }
}

#[async_trait]
impl QuoteSource for ZenQuotesSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let quotes = self.client.fetch_quotes().await?;
        Ok(quotes.into_iter().map(Quote::from).collect())
    }
}
