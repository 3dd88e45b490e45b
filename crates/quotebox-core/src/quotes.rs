// In-memory quote cache in front of a QuoteSource
use rand::Rng;
use tracing::{debug, error, info};

use crate::{models::Quote, source::QuoteSource, Error, Result};

/// What the UI shows when no quote could be loaded
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load quotes. Please try again later.";

/// Quote client with a session-lifetime cache
///
/// The first request fills the cache with one batch; every later request is
/// served from it. Nothing expires while the session is alive.
pub struct QuoteClient {
    source: Box<dyn QuoteSource>,
    cache: Vec<Quote>,
}

impl QuoteClient {
    pub fn new(source: Box<dyn QuoteSource>) -> Self {
        Self {
            source,
            cache: Vec::new(),
        }
    }

    /// Fetch a fresh batch and replace the cache with it
    ///
    /// On failure the cache is left exactly as it was.
    pub async fn fetch_batch(&mut self) -> Result<&[Quote]> {
        let quotes = match self.source.fetch_quotes().await {
            Ok(quotes) => quotes,
            Err(e) => {
                error!("Error fetching quotes: {}", e);
                return Err(e);
            }
        };

        if quotes.is_empty() {
            error!("Quote source returned an empty batch");
            return Err(Error::FetchError("empty batch".into()));
        }

        info!("Fetched {} quotes", quotes.len());
        self.cache = quotes;
        Ok(&self.cache)
    }

    /// One uniformly random quote, fetching first if the cache is empty
    pub async fn get_random(&mut self) -> Result<Quote> {
        if self.cache.is_empty() {
            debug!("Quote cache empty, fetching");
            self.fetch_batch().await?;
        } else {
            debug!("Serving quote from cache ({} cached)", self.cache.len());
        }

        let index = rand::thread_rng().gen_range(0..self.cache.len());
        Ok(self.cache[index].clone())
    }

    #[cfg(test)]
    fn cached(&self) -> &[Quote] {
        &self.cache
    }
}
