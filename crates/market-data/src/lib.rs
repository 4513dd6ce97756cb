//! Stockwatch Market Data Crate
//!
//! Provider-agnostic stock market data for the Stockwatch watchlist:
//! symbol search, latest quotes, batch quotes and historical candles.
//!
//! # Overview
//!
//! - Three interchangeable providers behind one trait: synthetic mock data,
//!   Finnhub (with Yahoo Finance charts for history) and Alpha Vantage
//! - Configuration-driven selection that degrades to mock data instead of
//!   failing
//! - A consuming service that turns results into serializable envelopes
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! | MarketDataService| --> |  Provider Factory|  (env config, singleton)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                      +-----------------------+
//!                      |  MarketDataProvider   |  (Mock, Finnhub, AlphaVantage)
//!                      +-----------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  HttpTransport   |  (reqwest in production)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Latest price for a listing
//! - [`Candle`] - One OHLCV bar of a historical series
//! - [`SearchResult`] - Listing found by a search
//! - [`Timeframe`] - Chart range (1D, 1W, 1M, 3M, 1Y, 5Y)
//! - [`MarketDataError`] - Provider failure taxonomy

pub mod errors;
pub mod factory;
pub mod models;
pub mod provider;
pub mod service;
pub mod transport;

pub use errors::MarketDataError;

// Re-export all public types from models
pub use models::{
    normalize_series, quote_key, Candle, Listing, Quote, SearchResult, SecurityType, Timeframe,
};

// Re-export provider types
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::mock::MockProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

pub use factory::{
    create_market_data_provider, get_market_data_provider, init_market_data_provider,
    MarketDataConfig, ProviderKind,
};
pub use service::{
    BatchQuotesResponse, CandleView, HistoricalDataResponse, MarketDataService, ProviderStatus,
    QuoteView, SearchStocksResponse, StockQuoteResponse,
};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
