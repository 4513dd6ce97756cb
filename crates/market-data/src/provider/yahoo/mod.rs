//! Yahoo Finance chart client.
//!
//! Finnhub's free tier has no candle endpoint, so historical data for the
//! Finnhub provider is served from Yahoo's public v8 chart API instead.
//! This client only covers that one endpoint.

mod models;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use reqwest::{StatusCode, Url};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::debug;
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{normalize_series, Candle, Timeframe};
use crate::transport::{HttpRequest, HttpTransport};

use models::YahooChartResponse;

pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub(crate) const YAHOO_SOURCE_ID: &str = "YAHOO";

/// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Client for `GET {base}/v8/finance/chart/{symbol}?range=&interval=`.
pub struct YahooChartClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: YAHOO_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Yahoo `(range, interval)` for a timeframe.
    pub fn chart_params(timeframe: Timeframe) -> (&'static str, &'static str) {
        match timeframe {
            Timeframe::OneDay => ("1d", "5m"),
            Timeframe::OneWeek => ("5d", "15m"),
            Timeframe::OneMonth => ("1mo", "1d"),
            Timeframe::ThreeMonths => ("3mo", "1d"),
            Timeframe::OneYear => ("1y", "1wk"),
            Timeframe::FiveYears => ("5y", "1mo"),
        }
    }

    fn chart_url(&self, symbol: &str, timeframe: Timeframe) -> Result<Url, MarketDataError> {
        let (range, interval) = Self::chart_params(timeframe);
        let raw = format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            encode(symbol)
        );

        Url::parse_with_params(&raw, &[("range", range), ("interval", interval)]).map_err(|e| {
            MarketDataError::VendorError {
                provider: YAHOO_SOURCE_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })
    }

    /// Fetch candles for a symbol. An unknown symbol yields an empty series.
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = self.chart_url(symbol, timeframe)?;
        debug!("Yahoo chart request: {}", url);

        let response = self
            .transport
            .get(HttpRequest::get(url).header("User-Agent", USER_AGENT))
            .await
            .map_err(|e| {
                if e.timed_out {
                    MarketDataError::Timeout {
                        provider: YAHOO_SOURCE_ID.to_string(),
                    }
                } else {
                    MarketDataError::NetworkFailure {
                        provider: YAHOO_SOURCE_ID.to_string(),
                        message: e.message,
                    }
                }
            })?;

        if response.status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::VendorRateLimited {
                provider: YAHOO_SOURCE_ID.to_string(),
            });
        }

        let candles = Self::parse_chart(response.status, &response.body)?;

        debug!(
            "Yahoo: fetched {} candles for {} ({})",
            candles.len(),
            symbol,
            timeframe
        );

        Ok(candles)
    }

    /// Convert a chart response to candles, skipping bars without open or close.
    ///
    /// Unknown symbols come back as 404 with a null result and yield an empty
    /// series. Any other non-2xx status, or a 2xx carrying only `chart.error`,
    /// is a vendor error.
    fn parse_chart(status: StatusCode, body: &str) -> Result<Vec<Candle>, MarketDataError> {
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let detail = serde_json::from_str::<YahooChartResponse>(body)
                .ok()
                .and_then(|response| response.chart)
                .and_then(|chart| chart.error)
                .map(|error| error.describe());

            return Err(MarketDataError::VendorError {
                provider: YAHOO_SOURCE_ID.to_string(),
                message: match detail {
                    Some(detail) => format!("HTTP {} - {}", status, detail),
                    None => format!("HTTP {}", status),
                },
            });
        }

        let response: YahooChartResponse =
            serde_json::from_str(body).map_err(|e| MarketDataError::VendorInvalidResponse {
                provider: YAHOO_SOURCE_ID.to_string(),
                message: format!("Failed to parse chart response: {}", e),
            })?;

        let Some(chart) = response.chart else {
            return Ok(Vec::new());
        };

        let result = chart.result.and_then(|results| results.into_iter().next());

        let Some(result) = result else {
            return match chart.error {
                Some(error) if status.is_success() => Err(MarketDataError::VendorError {
                    provider: YAHOO_SOURCE_ID.to_string(),
                    message: error.describe(),
                }),
                _ => Ok(Vec::new()),
            };
        };

        let Some(timestamps) = result.timestamp else {
            return Ok(Vec::new());
        };

        let Some(quote) = result
            .indicators
            .and_then(|indicators| indicators.quote.into_iter().next())
        else {
            return Ok(Vec::new());
        };

        fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
            values.get(i).copied().flatten()
        }

        let candles = timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let timestamp = Utc.timestamp_opt(ts, 0).single()?;
                let open = Decimal::from_f64(at(&quote.open, i)?)?;
                let close = Decimal::from_f64(at(&quote.close, i)?)?;
                let high = at(&quote.high, i)
                    .and_then(Decimal::from_f64)
                    .unwrap_or(open);
                let low = at(&quote.low, i).and_then(Decimal::from_f64).unwrap_or(open);
                let volume = at(&quote.volume, i).map(|v| v as u64).unwrap_or(0);

                Some(Candle {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume,
                })
            })
            .collect();

        Ok(normalize_series(candles))
    }
}
