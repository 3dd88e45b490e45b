// Core logic: quote cache, rate limiter, favorites and the session tying them together
pub mod config;
pub mod error;
pub mod favorites;
pub mod limiter;
pub mod models;
pub mod quotes;
pub mod session;
pub mod source;
pub mod storage;

pub use config::Config;
pub use error::Error;
pub use favorites::FavoritesStore;
pub use limiter::{RateDecision, RateLimiter, Usage};
pub use models::Quote;
pub use quotes::{QuoteClient, FETCH_FAILED_MESSAGE};
pub use session::{FavoriteOutcome, Intent, PopupSession, QuoteOutcome};
pub use source::{QuoteSource, ZenQuotesSource};
pub use storage::KeyValueStore;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
