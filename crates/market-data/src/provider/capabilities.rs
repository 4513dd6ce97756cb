//! Provider capabilities and rate limiting configuration.

use std::time::Duration;

use serde::Serialize;

/// Describes where a provider's data actually comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCapabilities {
    /// Upstream that serves historical candles. Differs from the provider
    /// id when history is delegated to a secondary vendor.
    pub historical_source: &'static str,

    /// Whether quotes come from a real market feed rather than synthetic data.
    pub live_data: bool,
}

/// Rate limiting configuration for a provider.
///
/// Controls how aggressively we can call a provider to avoid
/// hitting their rate limits and getting blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Published request ceiling per minute.
    pub requests_per_minute: u32,

    /// Delay inserted between sequential calls of a batch.
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            min_delay: Duration::from_millis(100),
        }
    }
}
