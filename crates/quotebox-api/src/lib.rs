// API client for the remote quote service
pub mod zenquotes;

// Re-export common types
pub use zenquotes::{ZenQuote, ZenQuotesClient, ZenQuotesError};
