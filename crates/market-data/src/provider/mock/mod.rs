//! Synthetic market data provider for development and tests.
//!
//! Shapes are deterministic (a fixed listing table, fixed base prices and
//! bar counts per timeframe) while the values are random. Each operation
//! sleeps for a fixed latency so callers exercise their real async paths.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{Candle, Listing, Quote, SearchResult, SecurityType, Timeframe};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

const PROVIDER_ID: &str = "MOCK";

const SEARCH_LATENCY: Duration = Duration::from_millis(300);
const QUOTE_LATENCY: Duration = Duration::from_millis(200);
const BATCH_LATENCY: Duration = Duration::from_millis(500);
const HISTORY_LATENCY: Duration = Duration::from_millis(400);

/// Base price for symbols missing from the table.
const DEFAULT_BASE_PRICE: i64 = 100;

/// (symbol, exchange, name, currency, country, base price)
const MOCK_LISTINGS: &[(&str, &str, &str, &str, &str, i64)] = &[
    ("AAPL", "NASDAQ", "Apple Inc.", "USD", "US", 175),
    ("TSLA", "NASDAQ", "Tesla, Inc.", "USD", "US", 250),
    ("GOOGL", "NASDAQ", "Alphabet Inc.", "USD", "US", 140),
    ("TSM", "NYSE", "Taiwan Semiconductor Manufacturing", "USD", "TW", 100),
    ("ASML", "NASDAQ", "ASML Holding N.V.", "USD", "NL", 750),
    ("SAP", "XETRA", "SAP SE", "EUR", "DE", 150),
    ("NVDA", "NASDAQ", "NVIDIA Corporation", "USD", "US", 500),
    ("MSFT", "NASDAQ", "Microsoft Corporation", "USD", "US", 380),
];

/// Synthetic provider. Needs no credentials and is always healthy.
#[derive(Debug, Default)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }

    /// Static reference price for a symbol.
    pub fn base_price(symbol: &str) -> Decimal {
        let price = MOCK_LISTINGS
            .iter()
            .find(|(s, ..)| *s == symbol)
            .map(|(.., price)| *price)
            .unwrap_or(DEFAULT_BASE_PRICE);
        Decimal::from(price)
    }

    /// Number of bars and spacing between them for a timeframe.
    fn series_shape(timeframe: Timeframe) -> (usize, TimeDelta) {
        match timeframe {
            // 6.5 trading hours of 5-minute bars
            Timeframe::OneDay => (78, TimeDelta::minutes(5)),
            Timeframe::OneWeek => (5, TimeDelta::days(1)),
            Timeframe::OneMonth => (21, TimeDelta::days(1)),
            Timeframe::ThreeMonths => (63, TimeDelta::days(1)),
            Timeframe::OneYear => (252, TimeDelta::days(1)),
            Timeframe::FiveYears => (60, TimeDelta::days(30)),
        }
    }

    fn matches(query: &str) -> Vec<SearchResult> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        MOCK_LISTINGS
            .iter()
            .filter(|(symbol, _, name, ..)| {
                symbol.to_lowercase().contains(&needle) || name.to_lowercase().contains(&needle)
            })
            .map(|(symbol, exchange, name, currency, country, _)| {
                SearchResult::new(*symbol, *exchange, *name, *currency, *country)
                    .with_type(SecurityType::Stock)
            })
            .collect()
    }

    fn random_quote(symbol: &str, exchange: &str, now: DateTime<Utc>) -> Quote {
        let mut rng = rand::thread_rng();
        let base = Self::base_price(symbol);

        // Cents in [-10.00, 10.00)
        let change = Decimal::new(rng.gen_range(-1000..1000), 2);
        let change_percent = (change / base * Decimal::ONE_HUNDRED).round_dp(4);
        let swing = change.abs();

        let mut quote = Quote::new(symbol, exchange, base + change, change, change_percent, now);
        quote.volume = Some(rng.gen_range(0..100_000_000));
        quote.market_cap = Some(
            base * Decimal::from(1_000_000_000_i64)
                + Decimal::from(rng.gen_range(0..500_000_000_000_i64)),
        );
        quote.high = Some(base + swing + Decimal::new(rng.gen_range(0..500), 2));
        quote.low = Some(base - swing - Decimal::new(rng.gen_range(0..500), 2));
        quote.open = Some(base + Decimal::new(rng.gen_range(-500..500), 2));
        quote.previous_close = Some(base);
        quote
    }

    fn random_series(symbol: &str, timeframe: Timeframe, now: DateTime<Utc>) -> Vec<Candle> {
        let mut rng = rand::thread_rng();
        let base = Self::base_price(symbol);
        let (count, step) = Self::series_shape(timeframe);

        let anchor = match timeframe {
            Timeframe::OneDay => now.duration_trunc(step),
            _ => now.duration_trunc(TimeDelta::days(1)),
        }
        .unwrap_or(now);

        // Fractions in basis points of a percent: 500 => 5%
        let pct = |bp: i64| Decimal::new(bp, 4);

        (0..count)
            .rev()
            .map(|i| {
                let timestamp = anchor - step * i as i32;
                let open = (base * (Decimal::ONE + pct(rng.gen_range(-500..500)))).round_dp(2);
                let close = (open * (Decimal::ONE + pct(rng.gen_range(-250..250)))).round_dp(2);
                let high = (open.max(close) * (Decimal::ONE + pct(rng.gen_range(0..200)))).round_dp(2);
                let low = (open.min(close) * (Decimal::ONE - pct(rng.gen_range(0..200)))).round_dp(2);

                Candle {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume: rng.gen_range(0..100_000_000),
                }
            })
            .collect()
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            historical_source: PROVIDER_ID,
            live_data: false,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: u32::MAX,
            min_delay: Duration::ZERO,
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        tokio::time::sleep(SEARCH_LATENCY).await;
        let results = Self::matches(query);
        debug!("Mock: {} search results for '{}'", results.len(), query);
        Ok(results)
    }

    async fn get_quote(&self, symbol: &str, exchange: &str) -> Result<Quote, MarketDataError> {
        tokio::time::sleep(QUOTE_LATENCY).await;
        Ok(Self::random_quote(symbol, exchange, Utc::now()))
    }

    async fn get_batch_quotes(
        &self,
        listings: &[Listing],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        if listings.is_empty() {
            return Ok(HashMap::new());
        }

        tokio::time::sleep(BATCH_LATENCY).await;

        let mut quotes = HashMap::with_capacity(listings.len());
        for listing in listings {
            let quote = self.get_quote(&listing.symbol, &listing.exchange).await?;
            quotes.insert(listing.key(), quote);
        }
        Ok(quotes)
    }

    async fn get_historical_data(
        &self,
        symbol: &str,
        _exchange: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Candle>, MarketDataError> {
        tokio::time::sleep(HISTORY_LATENCY).await;
        Ok(Self::random_series(symbol, timeframe, Utc::now()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
