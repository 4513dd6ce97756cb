//! Market data models
//!
//! This module contains the value types every provider produces:
//! - `types` - Listing identity (`Listing`, `quote_key`)
//! - `search` - Search result data (SearchResult, SecurityType)
//! - `quote` - Point-in-time quote (Quote)
//! - `candle` - Historical bars (Candle) and series normalization
//! - `timeframe` - Closed set of chart ranges (Timeframe)

mod candle;
mod quote;
mod search;
mod timeframe;
mod types;

pub use candle::{normalize_series, Candle};
pub use quote::Quote;
pub use search::{SearchResult, SecurityType};
pub use timeframe::Timeframe;
pub use types::{quote_key, Listing};
