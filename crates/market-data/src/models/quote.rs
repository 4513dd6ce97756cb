use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::quote_key;

/// Latest market quote for a listing.
///
/// Optional fields are vendor gaps: `None` means unknown, never zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub exchange: String,

    /// Last traded price
    pub price: Decimal,

    /// Absolute change against the previous close
    pub change: Decimal,

    /// Percent change against the previous close
    pub change_percent: Decimal,

    /// Observation instant (vendor-reported, or capture time)
    pub timestamp: DateTime<Utc>,

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

impl Quote {
    /// Create a quote with only the required fields set.
    pub fn new(
        symbol: impl Into<String>,
        exchange: impl Into<String>,
        price: Decimal,
        change: Decimal,
        change_percent: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            price,
            change,
            change_percent,
            timestamp,
            volume: None,
            market_cap: None,
            high: None,
            low: None,
            open: None,
            previous_close: None,
        }
    }

    /// Batch-result key for this quote.
    pub fn key(&self) -> String {
        quote_key(&self.symbol, &self.exchange)
    }
}
