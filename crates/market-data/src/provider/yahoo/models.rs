//! Yahoo Finance chart API response models.
//!
//! Only the `chart.result[0]` path used for candles is modelled. Every
//! level is optional because Yahoo drops fields for unknown symbols and
//! reports `null` for bars without trades.

use serde::Deserialize;

/// Main response wrapper for the v8 chart API
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: Option<YahooChart>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChart {
    pub result: Option<Vec<YahooChartResult>>,
    pub error: Option<YahooChartError>,
}

/// `chart.error`, set when Yahoo could not serve the request
#[derive(Debug, Deserialize)]
pub struct YahooChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

impl YahooChartError {
    pub fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{}: {}", code, description),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => "unknown chart error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<YahooIndicators>,
}

#[derive(Debug, Deserialize)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooQuoteIndicator>,
}

/// Parallel OHLCV arrays aligned with `YahooChartResult::timestamp`
#[derive(Debug, Default, Deserialize)]
pub struct YahooQuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}
