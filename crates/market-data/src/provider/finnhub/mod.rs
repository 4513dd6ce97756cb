//! Finnhub market data provider implementation.
//!
//! This module provides market data from Finnhub API:
//! - Latest quotes via /quote endpoint
//! - Symbol search via /search endpoint
//!
//! The free tier has no candle endpoint, so historical data is fetched
//! from the Yahoo Finance chart API instead (see [`YahooChartClient`]).
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

mod exchanges;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{StatusCode, Url};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{normalize_series, Candle, Quote, SearchResult, SecurityType, Timeframe};
use crate::provider::yahoo::{YahooChartClient, YAHOO_SOURCE_ID};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

pub use exchanges::{exchange_country, exchange_currency, exchange_for_symbol};

pub const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

/// Vendor security types kept in search results.
const SEARCHABLE_TYPES: &[&str] = &["Common Stock", "ETP", "ADR"];
const MAX_SEARCH_RESULTS: usize = 15;

/// Symbol used for the liveness probe.
const HEALTH_SYMBOL: &str = "AAPL";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High price of the day
    h: Option<f64>,
    /// Low price of the day
    l: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
    /// Previous close price
    pc: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Option<Vec<SearchItem>>,
}

/// Individual search result item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    /// Full description/name
    #[serde(default)]
    description: String,
    /// Display symbol, carries the exchange suffix
    #[serde(default)]
    display_symbol: String,
    /// Symbol for API calls
    #[serde(default)]
    symbol: String,
    /// Security type (e.g., "Common Stock", "ETP")
    #[serde(rename = "type", default)]
    security_type: String,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
///
/// Quotes and search come from Finnhub; historical candles come from
/// Yahoo Finance.
pub struct FinnhubProvider {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    base_url: String,
    chart: YahooChartClient,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_transport(api_key, Arc::new(ReqwestTransport::new()))
    }

    /// Create a provider that sends its requests through `transport`.
    pub fn with_transport(api_key: String, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            chart: YahooChartClient::new(transport.clone()),
            transport,
            api_key,
            base_url: FINNHUB_BASE_URL.to_string(),
        }
    }

    /// Override the Finnhub API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the Yahoo chart base URL used for historical data.
    pub fn with_chart_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.chart = self.chart.with_base_url(base_url);
        self
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("token", &self.api_key));

        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), endpoint);
        Url::parse_with_params(&raw, &all_params).map_err(|e| MarketDataError::VendorError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to build URL: {}", e),
        })
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let url = self.endpoint_url(endpoint, params)?;

        debug!(
            "Finnhub request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self
            .transport
            .get(HttpRequest::get(url))
            .await
            .map_err(|e| {
                if e.timed_out {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::NetworkFailure {
                        provider: PROVIDER_ID.to_string(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status;

        // Handle rate limiting; 403 means the key's quota is exhausted
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            return Err(MarketDataError::VendorRateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::VendorError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        if !status.is_success() {
            if let Ok(ErrorResponse { error: Some(message) }) =
                serde_json::from_str::<ErrorResponse>(&response.body)
            {
                return Err(MarketDataError::VendorError {
                    provider: PROVIDER_ID.to_string(),
                    message,
                });
            }

            return Err(MarketDataError::VendorError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, response.body),
            });
        }

        Ok(response.body)
    }

    fn parse_quote(symbol: &str, exchange: &str, body: &str) -> Result<Quote, MarketDataError> {
        let response: QuoteResponse =
            serde_json::from_str(body).map_err(|e| MarketDataError::VendorInvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse quote response: {}", e),
            })?;

        // Finnhub returns zeros for unknown symbols instead of an error
        let price = response
            .c
            .filter(|c| *c != 0.0)
            .and_then(Decimal::from_f64)
            .ok_or_else(|| MarketDataError::NoQuoteData(symbol.to_string()))?;

        let previous_close = response.pc.and_then(Decimal::from_f64);

        let change = response
            .d
            .and_then(Decimal::from_f64)
            .or_else(|| previous_close.map(|pc| price - pc))
            .unwrap_or(Decimal::ZERO);

        let change_percent = response
            .dp
            .and_then(Decimal::from_f64)
            .or_else(|| {
                previous_close
                    .filter(|pc| !pc.is_zero())
                    .map(|pc| (change / pc * Decimal::ONE_HUNDRED).round_dp(4))
            })
            .unwrap_or(Decimal::ZERO);

        let timestamp = response
            .t
            .filter(|t| *t > 0)
            .and_then(|t| Utc.timestamp_opt(t, 0).single())
            .unwrap_or_else(Utc::now);

        let mut quote = Quote::new(symbol, exchange, price, change, change_percent, timestamp);
        quote.high = response.h.and_then(Decimal::from_f64);
        quote.low = response.l.and_then(Decimal::from_f64);
        quote.open = response.o.and_then(Decimal::from_f64);
        quote.previous_close = previous_close;
        Ok(quote)
    }

    fn parse_search(body: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let response: SearchResponse =
            serde_json::from_str(body).map_err(|e| MarketDataError::VendorInvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse search response: {}", e),
            })?;

        let results = response
            .result
            .unwrap_or_default()
            .into_iter()
            .filter(|item| SEARCHABLE_TYPES.contains(&item.security_type.as_str()))
            .take(MAX_SEARCH_RESULTS)
            .map(|item| {
                let exchange = exchange_for_symbol(&item.display_symbol);
                let security_type = if item.security_type == "ETP" {
                    SecurityType::Etf
                } else {
                    SecurityType::Stock
                };

                SearchResult::new(
                    item.symbol,
                    exchange.clone(),
                    item.description,
                    exchange_currency(&exchange),
                    exchange_country(&exchange),
                )
                .with_type(security_type)
            })
            .collect();

        Ok(results)
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            historical_source: YAHOO_SOURCE_ID,
            live_data: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 60, // Free tier limit
            min_delay: Duration::from_millis(100),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Searching Finnhub for '{}'", query);
        let text = self.fetch("/search", &[("q", query)]).await?;
        let results = Self::parse_search(&text)?;
        debug!("Finnhub: found {} search results for '{}'", results.len(), query);

        Ok(results)
    }

    async fn get_quote(&self, symbol: &str, exchange: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Finnhub", symbol);
        let text = self.fetch("/quote", &[("symbol", symbol)]).await?;
        Self::parse_quote(symbol, exchange, &text)
    }

    async fn get_historical_data(
        &self,
        symbol: &str,
        _exchange: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Candle>, MarketDataError> {
        debug!(
            "Fetching {} history for {} from Yahoo on behalf of Finnhub",
            timeframe, symbol
        );
        let candles = self.chart.fetch_candles(symbol, timeframe).await?;
        Ok(normalize_series(candles))
    }

    async fn health_check(&self) -> bool {
        let Ok(url) = self.endpoint_url("/quote", &[("symbol", HEALTH_SYMBOL)]) else {
            return false;
        };

        match self.transport.get(HttpRequest::get(url)).await {
            Ok(response) => response.status.is_success(),
            Err(e) => {
                debug!("Finnhub health check failed: {}", e);
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
