//! Alpha Vantage market data provider implementation.
//!
//! Every operation goes to a single endpoint, selected by `function`:
//! - Symbol search via SYMBOL_SEARCH
//! - Latest quotes via GLOBAL_QUOTE
//! - Candles via TIME_SERIES_INTRADAY / TIME_SERIES_DAILY / TIME_SERIES_WEEKLY
//!
//! Alpha Vantage answers rate limiting and bad input with HTTP 200 and a
//! `Note`, `Information` or `Error Message` field in the body; those are
//! turned into errors before any payload is read.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use reqwest::{StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{normalize_series, Candle, Quote, SearchResult, SecurityType, Timeframe};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Symbol used for the liveness probe.
const HEALTH_SYMBOL: &str = "AAPL";

/// Zone of intraday keys when `Meta Data` does not name one.
const DEFAULT_MARKET_TZ: Tz = chrono_tz::US::Eastern;

const DEFAULT_REGION: &str = "US";
const DEFAULT_CURRENCY: &str = "USD";

/// Alpha Vantage market data provider.
pub struct AlphaVantageProvider {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    base_url: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// Any Alpha Vantage body: in-band error fields plus the operation payload
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(flatten)]
    payload: HashMap<String, serde_json::Value>,
}

/// GLOBAL_QUOTE payload; every number arrives as a string
#[derive(Debug, Default, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "02. open")]
    open: Option<String>,
    #[serde(rename = "03. high")]
    high: Option<String>,
    #[serde(rename = "04. low")]
    low: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "08. previous close")]
    previous_close: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

/// SYMBOL_SEARCH match
#[derive(Debug, Deserialize)]
struct SearchMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name", default)]
    name: String,
    #[serde(rename = "3. type")]
    security_type: Option<String>,
    #[serde(rename = "4. region")]
    region: Option<String>,
    #[serde(rename = "8. currency")]
    currency: Option<String>,
}

/// One row of any TIME_SERIES_* payload
#[derive(Debug, Deserialize)]
struct SeriesRow {
    #[serde(rename = "1. open")]
    open: Option<String>,
    #[serde(rename = "2. high")]
    high: Option<String>,
    #[serde(rename = "3. low")]
    low: Option<String>,
    #[serde(rename = "4. close")]
    close: Option<String>,
    #[serde(rename = "5. volume")]
    volume: Option<String>,
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_transport(api_key, Arc::new(ReqwestTransport::new()))
    }

    /// Create a provider that sends its requests through `transport`.
    pub fn with_transport(api_key: String, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key,
            base_url: ALPHA_VANTAGE_BASE_URL.to_string(),
        }
    }

    /// Override the API endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Time series function (and intraday interval) for a timeframe.
    pub fn series_function(timeframe: Timeframe) -> (&'static str, Option<&'static str>) {
        match timeframe {
            Timeframe::OneDay => ("TIME_SERIES_INTRADAY", Some("5min")),
            Timeframe::OneWeek | Timeframe::OneMonth => ("TIME_SERIES_DAILY", None),
            Timeframe::ThreeMonths | Timeframe::OneYear | Timeframe::FiveYears => {
                ("TIME_SERIES_WEEKLY", None)
            }
        }
    }

    fn query_url(&self, params: &[(&str, &str)]) -> Result<Url, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        Url::parse_with_params(&self.base_url, &all_params).map_err(|e| {
            MarketDataError::VendorError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })
    }

    /// Make a request to the Alpha Vantage API and unwrap the envelope.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<Envelope, MarketDataError> {
        let url = self.query_url(params)?;

        debug!(
            "Alpha Vantage request: {}",
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
                        message: e.message,
                    }
                }
            })?;

        if response.status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::VendorRateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !response.status.is_success() {
            return Err(MarketDataError::VendorError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", response.status),
            });
        }

        Self::parse_envelope(&response.body)
    }

    fn parse_envelope(body: &str) -> Result<Envelope, MarketDataError> {
        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| MarketDataError::VendorInvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        Self::check_api_error(&envelope)?;
        Ok(envelope)
    }

    /// Check for API-level errors carried in a 200 OK body.
    fn check_api_error(envelope: &Envelope) -> Result<(), MarketDataError> {
        // "Note" is how the API reports call frequency limits
        if let Some(ref msg) = envelope.note {
            debug!("Alpha Vantage note: {}", msg);
            return Err(MarketDataError::VendorRateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if let Some(ref msg) = envelope.error_message {
            return Err(MarketDataError::VendorError {
                provider: PROVIDER_ID.to_string(),
                message: msg.clone(),
            });
        }

        // "Information" can indicate various issues
        if let Some(ref msg) = envelope.information {
            let lower = msg.to_lowercase();
            if lower.contains("rate limit") || lower.contains("call frequency") {
                return Err(MarketDataError::VendorRateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage info: {}", msg);
        }

        Ok(())
    }

    /// Parse a decimal value from a string, tolerating a trailing `%`.
    fn parse_decimal(s: &str) -> Option<Decimal> {
        Decimal::from_str(s.trim().trim_end_matches('%')).ok()
    }

    /// Parse a series key.
    ///
    /// Intraday keys (`YYYY-MM-DD HH:MM:SS`) are wall-clock times in the
    /// market zone `tz`. Daily and weekly keys (`YYYY-MM-DD`) are calendar
    /// dates and map to UTC midnight.
    fn parse_timestamp(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
        if let Ok(local) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| Utc.from_utc_datetime(&dt))
    }

    /// Zone named by the `N. Time Zone` entry of `Meta Data`.
    fn series_timezone(meta: Option<&serde_json::Value>) -> Tz {
        meta.and_then(|meta| meta.as_object())
            .and_then(|meta| {
                meta.iter()
                    .find(|(key, _)| key.ends_with("Time Zone"))
                    .and_then(|(_, value)| value.as_str())
            })
            .and_then(|name| name.trim().parse::<Tz>().ok())
            .unwrap_or(DEFAULT_MARKET_TZ)
    }

    fn parse_search(envelope: Envelope) -> Result<Vec<SearchResult>, MarketDataError> {
        let Some(matches) = envelope.payload.get("bestMatches") else {
            return Ok(Vec::new());
        };

        let matches: Vec<SearchMatch> = serde_json::from_value(matches.clone()).map_err(|e| {
            MarketDataError::VendorInvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse bestMatches: {}", e),
            }
        })?;

        let results = matches
            .into_iter()
            .map(|m| {
                let region = m.region.unwrap_or_else(|| DEFAULT_REGION.to_string());
                let result = SearchResult::new(
                    m.symbol,
                    region.clone(),
                    m.name,
                    m.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                    region,
                );

                match m.security_type.as_deref().and_then(map_security_type) {
                    Some(security_type) => result.with_type(security_type),
                    None => result,
                }
            })
            .collect();

        Ok(results)
    }

    fn parse_quote(
        symbol: &str,
        exchange: &str,
        mut envelope: Envelope,
    ) -> Result<Quote, MarketDataError> {
        let raw = envelope.payload.remove("Global Quote").ok_or_else(|| {
            MarketDataError::VendorInvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("No Global Quote in response for {}", symbol),
            }
        })?;

        let global: GlobalQuote =
            serde_json::from_value(raw).map_err(|e| MarketDataError::VendorInvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse Global Quote: {}", e),
            })?;

        let parse = |field: &Option<String>| field.as_deref().and_then(Self::parse_decimal);

        // Unknown symbols come back as an empty "Global Quote": {}
        let price = parse(&global.price)
            .filter(|p| !p.is_zero())
            .ok_or_else(|| MarketDataError::NoQuoteData(symbol.to_string()))?;

        let previous_close = parse(&global.previous_close);
        let change = parse(&global.change)
            .or_else(|| previous_close.map(|pc| price - pc))
            .unwrap_or(Decimal::ZERO);
        let change_percent = parse(&global.change_percent).unwrap_or(Decimal::ZERO);

        let mut quote = Quote::new(symbol, exchange, price, change, change_percent, Utc::now());
        quote.volume = global.volume.as_deref().and_then(|v| v.trim().parse().ok());
        quote.high = parse(&global.high);
        quote.low = parse(&global.low);
        quote.open = parse(&global.open);
        quote.previous_close = previous_close;
        Ok(quote)
    }

    fn parse_series(
        symbol: &str,
        timeframe: Timeframe,
        envelope: Envelope,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let tz = Self::series_timezone(envelope.payload.get("Meta Data"));

        let Some(raw) = envelope
            .payload
            .into_iter()
            .find(|(key, _)| key.contains("Time Series"))
            .map(|(_, value)| value)
        else {
            return Err(MarketDataError::VendorInvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("No time series data found for {}", symbol),
            });
        };

        let serde_json::Value::Object(rows) = raw else {
            return Err(MarketDataError::VendorInvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Time series for {} is not an object", symbol),
            });
        };

        // Null or malformed rows are dropped individually
        let candles: Vec<Candle> = rows
            .into_iter()
            .filter_map(|(key, value)| {
                let row: SeriesRow = serde_json::from_value(value).ok()?;
                Some(Candle {
                    timestamp: Self::parse_timestamp(&key, tz)?,
                    open: Self::parse_decimal(row.open.as_deref()?)?,
                    high: Self::parse_decimal(row.high.as_deref()?)?,
                    low: Self::parse_decimal(row.low.as_deref()?)?,
                    close: Self::parse_decimal(row.close.as_deref()?)?,
                    volume: row.volume.as_deref()?.trim().parse().ok()?,
                })
            })
            .collect();

        // Rows arrive newest-first; the series is returned oldest-first
        let candles = normalize_series(candles);
        Ok(Self::trim_to_window(candles, timeframe))
    }

    /// Keep the bars within the timeframe's span of the newest bar.
    fn trim_to_window(candles: Vec<Candle>, timeframe: Timeframe) -> Vec<Candle> {
        let Some(newest) = candles.last().map(|c| c.timestamp) else {
            return candles;
        };
        let cutoff = newest - timeframe.span();

        candles
            .into_iter()
            .filter(|c| c.timestamp >= cutoff)
            .collect()
    }
}

// ============================================================================
// MarketDataProvider trait implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            historical_source: PROVIDER_ID,
            live_data: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 5, // Free tier is very limited
            min_delay: Duration::from_millis(200),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let envelope = self
            .fetch(&[("function", "SYMBOL_SEARCH"), ("keywords", query)])
            .await?;
        let results = Self::parse_search(envelope)?;

        debug!(
            "Alpha Vantage: found {} search results for '{}'",
            results.len(),
            query
        );

        Ok(results)
    }

    async fn get_quote(&self, symbol: &str, exchange: &str) -> Result<Quote, MarketDataError> {
        let envelope = self
            .fetch(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;
        Self::parse_quote(symbol, exchange, envelope)
    }

    async fn get_historical_data(
        &self,
        symbol: &str,
        _exchange: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let (function, interval) = Self::series_function(timeframe);

        let mut params = vec![("function", function), ("symbol", symbol)];
        if let Some(interval) = interval {
            params.push(("interval", interval));
        }

        let envelope = self.fetch(&params).await?;
        let candles = Self::parse_series(symbol, timeframe, envelope)?;

        debug!(
            "Alpha Vantage: fetched {} {} candles for {}",
            candles.len(),
            timeframe,
            symbol
        );

        Ok(candles)
    }

    async fn health_check(&self) -> bool {
        let Ok(url) = self.query_url(&[("function", "GLOBAL_QUOTE"), ("symbol", HEALTH_SYMBOL)])
        else {
            return false;
        };

        match self.transport.get(HttpRequest::get(url)).await {
            Ok(response) => response.status.is_success(),
            Err(e) => {
                debug!("Alpha Vantage health check failed: {}", e);
                false
            }
        }
    }
}

/// Map an Alpha Vantage `3. type` to our classification.
fn map_security_type(vendor_type: &str) -> Option<SecurityType> {
    match vendor_type.to_lowercase().as_str() {
        "equity" | "common stock" => Some(SecurityType::Stock),
        "etf" => Some(SecurityType::Etf),
        "index" => Some(SecurityType::Index),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn envelope(json: &str) -> Result<Envelope, MarketDataError> {
        AlphaVantageProvider::parse_envelope(json)
    }

    #[test]
    fn test_provider_id() {
        let provider = AlphaVantageProvider::new("test_key".to_string());
        assert_eq!(provider.id(), "ALPHA_VANTAGE");
    }

    #[test]
    fn test_rate_limit() {
        let provider = AlphaVantageProvider::new("test_key".to_string());
        let limit = provider.rate_limit();
        assert_eq!(limit.requests_per_minute, 5);
        assert_eq!(limit.min_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_series_function_by_timeframe() {
        type Av = AlphaVantageProvider;
        assert_eq!(
            Av::series_function(Timeframe::OneDay),
            ("TIME_SERIES_INTRADAY", Some("5min"))
        );
        assert_eq!(Av::series_function(Timeframe::OneWeek), ("TIME_SERIES_DAILY", None));
        assert_eq!(Av::series_function(Timeframe::OneMonth), ("TIME_SERIES_DAILY", None));
        assert_eq!(Av::series_function(Timeframe::ThreeMonths), ("TIME_SERIES_WEEKLY", None));
        assert_eq!(Av::series_function(Timeframe::OneYear), ("TIME_SERIES_WEEKLY", None));
        assert_eq!(Av::series_function(Timeframe::FiveYears), ("TIME_SERIES_WEEKLY", None));
    }

    #[test]
    fn test_parse_timestamp() {
        let daily = AlphaVantageProvider::parse_timestamp("2024-01-15", DEFAULT_MARKET_TZ).unwrap();
        assert_eq!(daily.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        // 15:55 Eastern in January is 20:55 UTC
        let intraday =
            AlphaVantageProvider::parse_timestamp("2024-01-15 15:55:00", DEFAULT_MARKET_TZ)
                .unwrap();
        assert_eq!(intraday.to_rfc3339(), "2024-01-15T20:55:00+00:00");

        // Daylight saving time: 4 hours behind UTC in July
        let summer =
            AlphaVantageProvider::parse_timestamp("2024-07-15 15:55:00", DEFAULT_MARKET_TZ)
                .unwrap();
        assert_eq!(summer.to_rfc3339(), "2024-07-15T19:55:00+00:00");

        assert!(AlphaVantageProvider::parse_timestamp("01-15-2024", DEFAULT_MARKET_TZ).is_none());
    }

    #[test]
    fn test_series_timezone_from_meta_data() {
        let meta = serde_json::json!({"1. Information": "Intraday (5min)", "6. Time Zone": "US/Eastern"});
        assert_eq!(
            AlphaVantageProvider::series_timezone(Some(&meta)),
            chrono_tz::US::Eastern
        );

        let meta = serde_json::json!({"5. Time Zone": "Europe/London"});
        assert_eq!(
            AlphaVantageProvider::series_timezone(Some(&meta)),
            chrono_tz::Europe::London
        );

        let meta = serde_json::json!({"5. Time Zone": "Mars/Olympus"});
        assert_eq!(
            AlphaVantageProvider::series_timezone(Some(&meta)),
            DEFAULT_MARKET_TZ
        );
        assert_eq!(AlphaVantageProvider::series_timezone(None), DEFAULT_MARKET_TZ);
    }

    #[test]
    fn test_intraday_series_uses_market_timezone() {
        let json = r#"{
            "Meta Data": {"1. Information": "Intraday (5min)", "2. Symbol": "IBM", "6. Time Zone": "US/Eastern"},
            "Time Series (5min)": {
                "2024-01-15 16:00:00": {"1. open": "2", "2. high": "2", "3. low": "2", "4. close": "2", "5. volume": "20"},
                "2024-01-15 15:55:00": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "10"}
            }
        }"#;

        let candles =
            AlphaVantageProvider::parse_series("IBM", Timeframe::OneDay, envelope(json).unwrap())
                .unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp.to_rfc3339(), "2024-01-15T20:55:00+00:00");
        assert_eq!(candles[1].timestamp.to_rfc3339(), "2024-01-15T21:00:00+00:00");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(AlphaVantageProvider::parse_decimal("150.25"), Some(dec!(150.25)));
        assert_eq!(AlphaVantageProvider::parse_decimal("-0.5432%"), Some(dec!(-0.5432)));
        assert!(AlphaVantageProvider::parse_decimal("invalid").is_none());
    }

    #[test]
    fn test_note_is_rate_limited() {
        let err = envelope(r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#)
            .unwrap_err();
        assert!(matches!(err, MarketDataError::VendorRateLimited { .. }));
    }

    #[test]
    fn test_error_message_is_vendor_error() {
        let err = envelope(r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#)
            .unwrap_err();
        match err {
            MarketDataError::VendorError { provider, message } => {
                assert_eq!(provider, "ALPHA_VANTAGE");
                assert!(message.starts_with("Invalid API call"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_information_rate_limit() {
        let err = envelope(r#"{"Information": "Our standard API rate limit is 25 requests per day."}"#)
            .unwrap_err();
        assert!(matches!(err, MarketDataError::VendorRateLimited { .. }));
    }

    #[test]
    fn test_global_quote_parsing() {
        let json = r#"{
            "Global Quote": {
                "01. symbol": "IBM",
                "02. open": "187.0000",
                "03. high": "189.5000",
                "04. low": "186.2500",
                "05. price": "188.8500",
                "06. volume": "4200123",
                "07. latest trading day": "2024-01-15",
                "08. previous close": "186.5000",
                "09. change": "2.3500",
                "10. change percent": "1.2601%"
            }
        }"#;

        let quote =
            AlphaVantageProvider::parse_quote("IBM", "NYSE", envelope(json).unwrap()).unwrap();
        assert_eq!(quote.symbol, "IBM");
        assert_eq!(quote.exchange, "NYSE");
        assert_eq!(quote.price, dec!(188.85));
        assert_eq!(quote.change, dec!(2.35));
        assert_eq!(quote.change_percent, dec!(1.2601));
        assert_eq!(quote.previous_close, Some(dec!(186.5)));
        assert_eq!(quote.volume, Some(4_200_123));
        assert!(quote.market_cap.is_none());
    }

    #[test]
    fn test_empty_global_quote_is_no_data() {
        let err = AlphaVantageProvider::parse_quote(
            "NOPE",
            "US",
            envelope(r#"{"Global Quote": {}}"#).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, MarketDataError::NoQuoteData(ref s) if s == "NOPE"));
    }

    #[test]
    fn test_missing_global_quote_is_invalid_response() {
        let err = AlphaVantageProvider::parse_quote("IBM", "US", envelope("{}").unwrap())
            .unwrap_err();
        assert!(matches!(err, MarketDataError::VendorInvalidResponse { .. }));
    }

    #[test]
    fn test_search_parsing_is_unfiltered() {
        let json = r#"{
            "bestMatches": [
                {"1. symbol": "TSCO.LON", "2. name": "Tesco PLC", "3. type": "Equity", "4. region": "United Kingdom", "8. currency": "GBX", "9. matchScore": "0.7273"},
                {"1. symbol": "TSCDF", "2. name": "Tesco plc", "3. type": "Mutual Fund", "4. region": "United States", "8. currency": "USD"},
                {"1. symbol": "TSCDY", "2. name": "Tesco plc ETF", "3. type": "ETF"}
            ]
        }"#;

        let results = AlphaVantageProvider::parse_search(envelope(json).unwrap()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].exchange, "United Kingdom");
        assert_eq!(results[0].country, "United Kingdom");
        assert_eq!(results[0].currency, "GBX");
        assert_eq!(results[0].security_type, Some(SecurityType::Stock));
        assert_eq!(results[1].security_type, None);
        assert_eq!(results[2].exchange, "US");
        assert_eq!(results[2].currency, "USD");
        assert_eq!(results[2].security_type, Some(SecurityType::Etf));
    }

    #[test]
    fn test_search_without_matches_is_empty() {
        let results = AlphaVantageProvider::parse_search(envelope("{}").unwrap()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_daily_series_is_ascending_and_drops_bad_rows() {
        let json = r#"{
            "Meta Data": {"2. Symbol": "IBM"},
            "Time Series (Daily)": {
                "2024-01-17": {"1. open": "3", "2. high": "3", "3. low": "3", "4. close": "3", "5. volume": "300"},
                "2024-01-16": {"1. open": "2", "2. high": "2", "3. low": "2", "4. close": "oops", "5. volume": "200"},
                "2024-01-15": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "100"}
            }
        }"#;

        let candles =
            AlphaVantageProvider::parse_series("IBM", Timeframe::OneMonth, envelope(json).unwrap())
                .unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close, dec!(1));
        assert_eq!(candles[1].close, dec!(3));
        assert_eq!(candles[1].volume, 300);
    }

    #[test]
    fn test_null_and_mistyped_rows_are_dropped() {
        let json = r#"{
            "Time Series (Daily)": {
                "2024-01-17": {"1. open": "3", "2. high": "3", "3. low": "3", "4. close": "3", "5. volume": "300"},
                "2024-01-16": null,
                "2024-01-15": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "100"},
                "2024-01-12": {"1. open": 1, "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "100"}
            }
        }"#;

        let candles =
            AlphaVantageProvider::parse_series("IBM", Timeframe::OneMonth, envelope(json).unwrap())
                .unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp.date_naive().to_string(), "2024-01-15");
        assert_eq!(candles[1].timestamp.date_naive().to_string(), "2024-01-17");
    }

    #[test]
    fn test_weekly_series_key_is_found() {
        let json = r#"{
            "Weekly Time Series": {
                "2024-01-12": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "1"}
            }
        }"#;

        let candles =
            AlphaVantageProvider::parse_series("IBM", Timeframe::OneYear, envelope(json).unwrap())
                .unwrap();
        assert_eq!(candles.len(), 1);
    }

    #[test]
    fn test_series_is_trimmed_to_timeframe() {
        let json = r#"{
            "Time Series (Daily)": {
                "2024-03-01": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "1"},
                "2024-02-27": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "1"},
                "2024-01-02": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "1"}
            }
        }"#;

        let candles =
            AlphaVantageProvider::parse_series("IBM", Timeframe::OneWeek, envelope(json).unwrap())
                .unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp.date_naive().to_string(), "2024-02-27");
    }

    #[test]
    fn test_empty_series_is_empty() {
        let candles = AlphaVantageProvider::parse_series(
            "IBM",
            Timeframe::OneMonth,
            envelope(r#"{"Time Series (Daily)": {}}"#).unwrap(),
        )
        .unwrap();
        assert!(candles.is_empty());
    }

    #[test]
    fn test_missing_series_is_invalid_response() {
        let err = AlphaVantageProvider::parse_series(
            "IBM",
            Timeframe::OneMonth,
            envelope(r#"{"Meta Data": {}}"#).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, MarketDataError::VendorInvalidResponse { .. }));
    }

    #[test]
    fn test_map_security_type() {
        assert_eq!(map_security_type("Equity"), Some(SecurityType::Stock));
        assert_eq!(map_security_type("ETF"), Some(SecurityType::Etf));
        assert_eq!(map_security_type("Index"), Some(SecurityType::Index));
        assert_eq!(map_security_type("Mutual Fund"), None);
    }
}
