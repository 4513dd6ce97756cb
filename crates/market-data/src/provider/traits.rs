//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use crate::errors::MarketDataError;
use crate::models::{Candle, Listing, Quote, SearchResult, Timeframe};

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Trait for market data providers.
///
/// Every provider implements the full capability set against its own
/// upstream; callers only ever see this contract.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockwatch_market_data::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             historical_source: "MY_PROVIDER",
///             live_data: true,
///         }
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     // ... implement search, quote, history and health methods
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "FINNHUB", "ALPHA_VANTAGE", etc.
    fn id(&self) -> &'static str;

    /// Describes where this provider's data comes from.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Rate limiting configuration.
    ///
    /// `min_delay` spaces the sequential calls of [`get_batch_quotes`](Self::get_batch_quotes).
    fn rate_limit(&self) -> RateLimit;

    /// Search for listings matching the query.
    ///
    /// A blank query or no matches yields an empty vector. Ordering is
    /// whatever the upstream considers most relevant.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError>;

    /// Fetch the latest quote for a listing.
    ///
    /// Fails with [`MarketDataError::NoQuoteData`] when the upstream has no
    /// tradable price for the symbol.
    async fn get_quote(&self, symbol: &str, exchange: &str) -> Result<Quote, MarketDataError>;

    /// Fetch quotes for several listings, keyed by `"<symbol>:<exchange>"`.
    ///
    /// The default implementation fetches one listing at a time, waiting
    /// `rate_limit().min_delay` between calls. A listing whose fetch fails
    /// is logged and left out of the map; partial results are expected.
    async fn get_batch_quotes(
        &self,
        listings: &[Listing],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let mut quotes = HashMap::with_capacity(listings.len());
        let delay = self.rate_limit().min_delay;

        for (i, listing) in listings.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.get_quote(&listing.symbol, &listing.exchange).await {
                Ok(quote) => {
                    quotes.insert(listing.key(), quote);
                }
                Err(e) => {
                    warn!(
                        "{}: failed to fetch quote for {}: {}",
                        self.id(),
                        listing.key(),
                        e
                    );
                }
            }
        }

        Ok(quotes)
    }

    /// Fetch historical candles for a listing over a timeframe.
    ///
    /// The result is strictly ascending by timestamp with no duplicates,
    /// and empty when the upstream has no data for the window.
    async fn get_historical_data(
        &self,
        symbol: &str,
        exchange: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Best-effort liveness probe. Never fails; every fault is `false`.
    async fn health_check(&self) -> bool;
}
