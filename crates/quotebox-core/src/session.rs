// Session state for one open popup, plus the intents that drive it
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    config::Config,
    favorites::FavoritesStore,
    limiter::{RateDecision, RateLimiter, Usage},
    models::Quote,
    quotes::{QuoteClient, FETCH_FAILED_MESSAGE},
    source::QuoteSource,
    storage::KeyValueStore,
    Error, Result,
};

/// A user action coming from the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    NextQuote,
    FavoriteQuote,
    ClearFavorites,
    DeleteQuote(String),
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "next-quote" => Ok(Intent::NextQuote),
            "favorite-quote" => Ok(Intent::FavoriteQuote),
            "clear-favorites" => Ok(Intent::ClearFavorites),
            _ => match s.strip_prefix("delete-quote:") {
                Some(quote) => Ok(Intent::DeleteQuote(quote.to_string())),
                None => Err(Error::UnknownIntent(s.to_string())),
            },
        }
    }
}

/// Result of asking for a quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
    Shown(Quote),
    /// Over the hourly limit; nothing was fetched
    Limited { minutes_remaining: i64 },
    /// Quotes could not be loaded; show the placeholder
    Unavailable,
}

impl QuoteOutcome {
    /// Text for the quote area, None when the display should stay as is
    pub fn display_text(&self) -> Option<String> {
        match self {
            QuoteOutcome::Shown(quote) => Some(quote.to_string()),
            QuoteOutcome::Unavailable => Some(FETCH_FAILED_MESSAGE.to_string()),
            QuoteOutcome::Limited { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added(Vec<String>),
    AlreadySaved,
    /// No quote has been shown successfully yet
    NothingToSave,
}

/// Everything one popup instance owns
///
/// The quote cache, current quote and view counter die with the session.
/// Timestamps and favorites go through the key-value store and outlive it.
pub struct PopupSession {
    quotes: QuoteClient,
    limiter: RateLimiter,
    favorites: FavoritesStore,
    current_quote: Option<Quote>,
    quotes_viewed: u32,
}

impl PopupSession {
    pub fn new(
        source: Box<dyn QuoteSource>,
        store: Arc<dyn KeyValueStore>,
        config: &Config,
    ) -> Self {
        Self {
            quotes: QuoteClient::new(source),
            limiter: RateLimiter::new(store.clone(), &config.limits),
            favorites: FavoritesStore::new(store),
            current_quote: None,
            quotes_viewed: 0,
        }
    }

    /// Show the first quote. Does not touch the limiter.
    pub async fn open(&mut self) -> QuoteOutcome {
        info!("Session opened");
        self.show_quote().await
    }

    pub async fn next_quote(&mut self) -> Result<QuoteOutcome> {
        self.next_quote_at(chrono::Utc::now().timestamp_millis()).await
    }

    /// Checked and recorded quote refresh at `now` (epoch ms)
    ///
    /// Only a quote that was actually shown consumes a slot and bumps the
    /// view counter.
    pub async fn next_quote_at(&mut self, now: i64) -> Result<QuoteOutcome> {
        if let RateDecision::Denied { minutes_remaining } = self.limiter.check(now).await? {
            return Ok(QuoteOutcome::Limited { minutes_remaining });
        }

        match self.quotes.get_random().await {
            Ok(quote) => {
                // Nothing changes on screen unless the slot was recorded
                self.limiter.record(now).await?;
                self.current_quote = Some(quote.clone());
                self.quotes_viewed += 1;
                Ok(QuoteOutcome::Shown(quote))
            }
            Err(e) => Ok(self.show_placeholder(e)),
        }
    }

    async fn show_quote(&mut self) -> QuoteOutcome {
        match self.quotes.get_random().await {
            Ok(quote) => {
                self.current_quote = Some(quote.clone());
                QuoteOutcome::Shown(quote)
            }
            Err(e) => self.show_placeholder(e),
        }
    }

    fn show_placeholder(&mut self, err: Error) -> QuoteOutcome {
        debug!("Showing placeholder: {}", err);
        self.current_quote = None;
        QuoteOutcome::Unavailable
    }

    /// Save the quote on screen to favorites
    pub async fn favorite_current(&self) -> Result<FavoriteOutcome> {
        let Some(quote) = &self.current_quote else {
            return Ok(FavoriteOutcome::NothingToSave);
        };

        if self.favorites.add(&quote.to_string()).await? {
            Ok(FavoriteOutcome::Added(self.favorites.list().await?))
        } else {
            Ok(FavoriteOutcome::AlreadySaved)
        }
    }

    pub async fn delete_favorite(&self, quote: &str) -> Result<Vec<String>> {
        self.favorites.remove(quote).await
    }

    /// Clear all favorites, but only once the user has confirmed
    ///
    /// Returns whether anything was cleared.
    pub async fn clear_favorites(&self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            debug!("Clear favorites not confirmed");
            return Ok(false);
        }
        self.favorites.clear().await?;
        Ok(true)
    }

    pub async fn favorites(&self) -> Result<Vec<String>> {
        self.favorites.list().await
    }

    pub async fn usage(&self) -> Result<Usage> {
        self.limiter.usage(chrono::Utc::now().timestamp_millis()).await
    }

    pub fn current_quote(&self) -> Option<&Quote> {
        self.current_quote.as_ref()
    }

    pub fn quotes_viewed(&self) -> u32 {
        self.quotes_viewed
    }

    pub fn max_quotes(&self) -> usize {
        self.limiter.max_quotes()
    }
}
