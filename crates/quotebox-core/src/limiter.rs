// Rolling-window limit on how many quotes can be generated
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    config::LimitConfig,
    storage::{load_list, save_list, KeyValueStore, GENERATION_TIMES_KEY},
    Result,
};

const MS_PER_MINUTE: i64 = 60_000;

/// Outcome of a limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Denied { minutes_remaining: i64 },
}

/// Snapshot of the quota, for status displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub used: usize,
    pub limit: usize,
    /// Minutes until the oldest event leaves the window, if any are inside it
    pub minutes_until_slot: Option<i64>,
}

impl Usage {
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used)
    }
}

/// Keep only timestamps still inside the window ending at `now`
///
/// Drops exactly the entries with `now - t >= window_ms`; the survivors
/// keep their original order.
pub fn prune(timestamps: &[i64], now: i64, window_ms: i64) -> Vec<i64> {
    timestamps
        .iter()
        .copied()
        .filter(|&t| now.saturating_sub(t) < window_ms)
        .collect()
}

/// `ceil((window - (now - oldest)) / 1 minute)`
pub fn minutes_until_expiry(oldest: i64, now: i64, window_ms: i64) -> i64 {
    let remaining_ms = window_ms.saturating_sub(now.saturating_sub(oldest)).max(0);
    remaining_ms
        .saturating_add(MS_PER_MINUTE - 1)
        .div_euclid(MS_PER_MINUTE)
}

/// The message shown when the limit is hit
pub fn limit_message(max_quotes: usize, minutes_remaining: i64) -> String {
    format!(
        "You've reached the hourly quote limit ({} quotes per hour). Please wait {} minutes before generating more quotes. Remember to focus on your work! 😊",
        max_quotes, minutes_remaining
    )
}

/// Persistent sliding-window limiter
///
/// Event timestamps (epoch ms) live in the key-value store under
/// `quoteGenerationTimes`, oldest first.
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    max_quotes: usize,
    window_ms: i64,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &LimitConfig) -> Self {
        Self {
            store,
            max_quotes: config.max_quotes,
            window_ms: config.window_ms,
        }
    }

    pub fn max_quotes(&self) -> usize {
        self.max_quotes
    }

    /// Load and prune, writing back if anything fell out of the window
    async fn load_pruned(&self, now: i64) -> Result<Vec<i64>> {
        let timestamps: Vec<i64> = load_list(self.store.as_ref(), GENERATION_TIMES_KEY).await?;
        let pruned = prune(&timestamps, now, self.window_ms);

        if pruned.len() != timestamps.len() {
            debug!(
                "Pruned {} expired timestamps",
                timestamps.len() - pruned.len()
            );
            save_list(self.store.as_ref(), GENERATION_TIMES_KEY, &pruned).await?;
        }

        Ok(pruned)
    }

    /// Decide whether one more quote may be generated at `now`
    pub async fn check(&self, now: i64) -> Result<RateDecision> {
        let timestamps = self.load_pruned(now).await?;

        if timestamps.len() >= self.max_quotes {
            // A zero quota has nothing in the window to wait for
            let minutes_remaining = timestamps
                .first()
                .map_or(0, |&oldest| minutes_until_expiry(oldest, now, self.window_ms));
            warn!(
                "Quote limit reached ({}/{}), {} minutes until next slot",
                timestamps.len(),
                self.max_quotes,
                minutes_remaining
            );
            return Ok(RateDecision::Denied { minutes_remaining });
        }

        Ok(RateDecision::Allowed)
    }

    /// Count one generated quote at `now`
    pub async fn record(&self, now: i64) -> Result<()> {
        let mut timestamps = self.load_pruned(now).await?;
        timestamps.push(now);
        save_list(self.store.as_ref(), GENERATION_TIMES_KEY, &timestamps).await?;

        info!("Recorded quote generation ({}/{})", timestamps.len(), self.max_quotes);
        Ok(())
    }

    /// Read-only view of the quota at `now`
    pub async fn usage(&self, now: i64) -> Result<Usage> {
        let timestamps: Vec<i64> = load_list(self.store.as_ref(), GENERATION_TIMES_KEY).await?;
        let live = prune(&timestamps, now, self.window_ms);

        Ok(Usage {
            used: live.len(),
            limit: self.max_quotes,
            minutes_until_slot: live
                .first()
                .map(|&oldest| minutes_until_expiry(oldest, now, self.window_ms)),
        })
    }
}
