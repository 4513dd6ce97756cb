//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities and rate limiting configuration
//! - Concrete provider implementations (Mock, Finnhub, Alpha Vantage)
//! - The Yahoo chart client Finnhub delegates historical data to

mod capabilities;
mod traits;

pub mod alpha_vantage;
pub mod finnhub;
pub mod mock;
pub mod yahoo;

// Re-exports
pub use capabilities::{ProviderCapabilities, RateLimit};
pub use traits::MarketDataProvider;
