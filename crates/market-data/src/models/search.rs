//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

/// Coarse security classification reported with search results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityType {
    Stock,
    Etf,
    Index,
}

/// Result from a ticker/symbol search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Symbol/ticker (e.g., "AAPL", "SHOP.TO")
    pub symbol: String,

    /// Exchange code (e.g., "NASDAQ", "TSX")
    pub exchange: String,

    /// Display name (e.g., "Apple Inc.")
    pub name: String,

    /// Trading currency (e.g., "USD", "CAD")
    pub currency: String,

    /// Country code or region name
    pub country: String,

    /// Classification, when the vendor provides one
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub security_type: Option<SecurityType>,
}

impl SearchResult {
    /// Create a new search result with required fields.
    pub fn new(
        symbol: impl Into<String>,
        exchange: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            name: name.into(),
            currency: currency.into(),
            country: country.into(),
            security_type: None,
        }
    }

    /// Set the security type.
    pub fn with_type(mut self, security_type: SecurityType) -> Self {
        self.security_type = Some(security_type);
        self
    }
}
