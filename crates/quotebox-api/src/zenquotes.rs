use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ZenQuotesError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ZenQuotesError>;

/// A quote exactly as the API returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZenQuote {
    /// Quote text
    pub q: String,
    /// Author
    pub a: String,
    /// Pre-rendered HTML, not used by us
    #[serde(default)]
    pub h: Option<String>,
}

pub struct ZenQuotesClient {
    client: reqwest::Client,
    base_url: String,
}

impl ZenQuotesClient {
    /// Client for the API at `base_url`, optionally bounding each request
    pub fn with_base_url(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("quotebox/0.1.0"),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn quotes_url(&self) -> String {
        format!("{}/quotes/", self.base_url)
    }

    /// Fetch one batch of quotes
    ///
    /// No pagination and no retries: one request, one batch.
    pub async fn fetch_quotes(&self) -> Result<Vec<ZenQuote>> {
        let url = self.quotes_url();
        debug!("Fetching quotes from {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Quote request returned {}", status);
            return Err(ZenQuotesError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        parse_quotes(&body)
    }
}

/// Parse the JSON array body returned by the quotes endpoint
pub fn parse_quotes(body: &str) -> Result<Vec<ZenQuote>> {
    let quotes: Vec<ZenQuote> = serde_json::from_str(body)?;
    Ok(quotes)
}
