//! Caller-facing market data operations.
//!
//! [`MarketDataService`] wraps the active provider and turns every outcome
//! into a serializable envelope: `{ success, error?, ...payload }`. Provider
//! errors are logged here and replaced by a generic message; they never
//! propagate to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::error;

use crate::models::{Candle, Listing, Quote, SearchResult, Timeframe};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const SEARCH_FAILED: &str = "Search failed";
const QUOTE_FAILED: &str = "Failed to get quote";
const BATCH_FAILED: &str = "Failed to get quotes";
const HISTORY_FAILED: &str = "Failed to get historical data";

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Quote with its timestamp rendered as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    pub symbol: String,
    pub exchange: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,
}

impl From<Quote> for QuoteView {
    fn from(quote: Quote) -> Self {
        Self {
            timestamp: iso_timestamp(&quote.timestamp),
            symbol: quote.symbol,
            exchange: quote.exchange,
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            volume: quote.volume,
            market_cap: quote.market_cap,
            high: quote.high,
            low: quote.low,
            open: quote.open,
            previous_close: quote.previous_close,
        }
    }
}

/// Candle with its timestamp rendered as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleView {
    pub timestamp: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

impl From<Candle> for CandleView {
    fn from(candle: Candle) -> Self {
        Self {
            timestamp: iso_timestamp(&candle.timestamp),
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchStocksResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockQuoteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchQuotesResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes: Option<BTreeMap<String, QuoteView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoricalDataResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub candles: Vec<CandleView>,
}

/// Active provider description.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub id: &'static str,
    pub capabilities: ProviderCapabilities,
    pub healthy: bool,
}

/// Envelope-producing facade over a provider.
#[derive(Clone)]
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn search_stocks(&self, query: &str) -> SearchStocksResponse {
        match self.provider.search(query).await {
            Ok(results) => SearchStocksResponse {
                success: true,
                error: None,
                results,
            },
            Err(e) => {
                error!("Search failed: {}", e);
                SearchStocksResponse {
                    success: false,
                    error: Some(SEARCH_FAILED.to_string()),
                    results: Vec::new(),
                }
            }
        }
    }

    pub async fn get_stock_quote(&self, symbol: &str, exchange: &str) -> StockQuoteResponse {
        match self.provider.get_quote(symbol, exchange).await {
            Ok(quote) => StockQuoteResponse {
                success: true,
                error: None,
                quote: Some(quote.into()),
            },
            Err(e) => {
                error!("Failed to get quote for {}:{}: {}", symbol, exchange, e);
                StockQuoteResponse {
                    success: false,
                    error: Some(QUOTE_FAILED.to_string()),
                    quote: None,
                }
            }
        }
    }

    pub async fn get_batch_quotes(&self, listings: &[Listing]) -> BatchQuotesResponse {
        match self.provider.get_batch_quotes(listings).await {
            Ok(quotes) => BatchQuotesResponse {
                success: true,
                error: None,
                quotes: Some(
                    quotes
                        .into_iter()
                        .map(|(key, quote)| (key, quote.into()))
                        .collect(),
                ),
            },
            Err(e) => {
                error!("Failed to get batch quotes: {}", e);
                BatchQuotesResponse {
                    success: false,
                    error: Some(BATCH_FAILED.to_string()),
                    quotes: None,
                }
            }
        }
    }

    pub async fn get_historical_data(
        &self,
        symbol: &str,
        exchange: &str,
        timeframe: Timeframe,
    ) -> HistoricalDataResponse {
        match self
            .provider
            .get_historical_data(symbol, exchange, timeframe)
            .await
        {
            Ok(candles) => HistoricalDataResponse {
                success: true,
                error: None,
                candles: candles.into_iter().map(CandleView::from).collect(),
            },
            Err(e) => {
                error!(
                    "Failed to get {} history for {}:{}: {}",
                    timeframe, symbol, exchange, e
                );
                HistoricalDataResponse {
                    success: false,
                    error: Some(HISTORY_FAILED.to_string()),
                    candles: Vec::new(),
                }
            }
        }
    }

    pub async fn health(&self) -> ProviderStatus {
        ProviderStatus {
            id: self.provider.id(),
            capabilities: self.provider.capabilities(),
            healthy: self.provider.health_check().await,
        }
    }
}
