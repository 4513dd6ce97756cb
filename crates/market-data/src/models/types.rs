use serde::{Deserialize, Serialize};

/// Build the batch-result key for a listing: `"<symbol>:<exchange>"`.
pub fn quote_key(symbol: &str, exchange: &str) -> String {
    format!("{}:{}", symbol, exchange)
}

/// A symbol on a specific exchange, as requested by a caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: String,
    pub exchange: String,
}

impl Listing {
    pub fn new(symbol: impl Into<String>, exchange: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
        }
    }

    /// Key under which this listing's quote appears in a batch result.
    pub fn key(&self) -> String {
        quote_key(&self.symbol, &self.exchange)
    }
}
