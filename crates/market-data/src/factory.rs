//! Provider selection.
//!
//! Picks the concrete [`MarketDataProvider`] from configuration, falling back
//! to [`MockProvider`] whenever the requested vendor cannot be used, and holds
//! the process-wide instance.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::provider::alpha_vantage::AlphaVantageProvider;
use crate::provider::finnhub::FinnhubProvider;
use crate::provider::mock::MockProvider;
use crate::provider::MarketDataProvider;

pub const PROVIDER_ENV: &str = "MARKET_DATA_PROVIDER";
pub const ALPHA_VANTAGE_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";
pub const FINNHUB_KEY_ENV: &str = "FINNHUB_API_KEY";

/// Values shipped in the sample environment file; never valid keys.
const ALPHA_VANTAGE_PLACEHOLDER: &str = "your-alpha-vantage-api-key";
const FINNHUB_PLACEHOLDER: &str = "your-finnhub-api-key";

static PROVIDER: OnceLock<Arc<dyn MarketDataProvider>> = OnceLock::new();

/// Known provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Mock,
    AlphaVantage,
    Finnhub,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Mock => "mock",
            ProviderKind::AlphaVantage => "alpha_vantage",
            ProviderKind::Finnhub => "finnhub",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "alpha_vantage" => Ok(ProviderKind::AlphaVantage),
            "finnhub" => Ok(ProviderKind::Finnhub),
            other => Err(format!("unknown market data provider: {other}")),
        }
    }
}

/// Provider selection inputs.
#[derive(Debug, Clone, Default)]
pub struct MarketDataConfig {
    /// Raw provider identifier; unset means mock.
    pub provider: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub finnhub_api_key: Option<String>,
}

impl MarketDataConfig {
    /// Read `MARKET_DATA_PROVIDER`, `ALPHA_VANTAGE_API_KEY` and `FINNHUB_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            provider: lookup(PROVIDER_ENV),
            alpha_vantage_api_key: lookup(ALPHA_VANTAGE_KEY_ENV),
            finnhub_api_key: lookup(FINNHUB_KEY_ENV),
        }
    }
}

/// Returns the key when it is present, non-blank and not the sample value.
fn usable_key<'a>(key: Option<&'a str>, placeholder: &str) -> Option<&'a str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && *k != placeholder)
}

/// Build a provider. `explicit` takes precedence over `config.provider`.
///
/// Never fails: an unknown identifier or a missing/placeholder key logs a
/// warning and yields the mock provider.
pub fn create_market_data_provider(
    explicit: Option<&str>,
    config: &MarketDataConfig,
) -> Arc<dyn MarketDataProvider> {
    let requested = explicit
        .or(config.provider.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let Some(requested) = requested else {
        info!("No market data provider configured, using mock data");
        return Arc::new(MockProvider::new());
    };

    let kind = match requested.parse::<ProviderKind>() {
        Ok(kind) => kind,
        Err(e) => {
            warn!("{}, falling back to mock data", e);
            return Arc::new(MockProvider::new());
        }
    };

    match kind {
        ProviderKind::Mock => Arc::new(MockProvider::new()),
        ProviderKind::AlphaVantage => {
            match usable_key(
                config.alpha_vantage_api_key.as_deref(),
                ALPHA_VANTAGE_PLACEHOLDER,
            ) {
                Some(key) => {
                    info!("Using Alpha Vantage market data provider");
                    Arc::new(AlphaVantageProvider::new(key.to_string()))
                }
                None => {
                    warn!(
                        "{} is not configured, falling back to mock data",
                        ALPHA_VANTAGE_KEY_ENV
                    );
                    Arc::new(MockProvider::new())
                }
            }
        }
        ProviderKind::Finnhub => {
            match usable_key(config.finnhub_api_key.as_deref(), FINNHUB_PLACEHOLDER) {
                Some(key) => {
                    info!("Using Finnhub market data provider");
                    Arc::new(FinnhubProvider::new(key.to_string()))
                }
                None => {
                    warn!(
                        "{} is not configured, falling back to mock data",
                        FINNHUB_KEY_ENV
                    );
                    Arc::new(MockProvider::new())
                }
            }
        }
    }
}

/// Seed the process-wide provider from `config`.
///
/// Only the first initialization wins; later calls return the existing
/// instance unchanged.
pub fn init_market_data_provider(config: &MarketDataConfig) -> Arc<dyn MarketDataProvider> {
    PROVIDER
        .get_or_init(|| create_market_data_provider(None, config))
        .clone()
}

/// Process-wide provider, built from the environment on first access.
pub fn get_market_data_provider() -> Arc<dyn MarketDataProvider> {
    PROVIDER
        .get_or_init(|| create_market_data_provider(None, &MarketDataConfig::from_env()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, av: Option<&str>, fh: Option<&str>) -> MarketDataConfig {
        MarketDataConfig {
            provider: Some(provider.to_string()),
            alpha_vantage_api_key: av.map(String::from),
            finnhub_api_key: fh.map(String::from),
        }
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("mock".parse::<ProviderKind>(), Ok(ProviderKind::Mock));
        assert_eq!(
            "Alpha_Vantage".parse::<ProviderKind>(),
            Ok(ProviderKind::AlphaVantage)
        );
        assert_eq!(" FINNHUB ".parse::<ProviderKind>(), Ok(ProviderKind::Finnhub));
        assert!("polygon".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::AlphaVantage.to_string(), "alpha_vantage");
    }

    #[test]
    fn test_from_lookup() {
        let config = MarketDataConfig::from_lookup(|key| match key {
            PROVIDER_ENV => Some("finnhub".to_string()),
            FINNHUB_KEY_ENV => Some("abc".to_string()),
            _ => None,
        });
        assert_eq!(config.provider.as_deref(), Some("finnhub"));
        assert_eq!(config.finnhub_api_key.as_deref(), Some("abc"));
        assert!(config.alpha_vantage_api_key.is_none());
    }

    #[test]
    fn test_unset_provider_is_mock() {
        let provider = create_market_data_provider(None, &MarketDataConfig::default());
        assert_eq!(provider.id(), "MOCK");
    }

    #[test]
    fn test_vendor_with_key() {
        let provider =
            create_market_data_provider(None, &config("alpha_vantage", Some("real-key"), None));
        assert_eq!(provider.id(), "ALPHA_VANTAGE");

        let provider = create_market_data_provider(None, &config("finnhub", None, Some("k")));
        assert_eq!(provider.id(), "FINNHUB");
    }

    #[test]
    fn test_placeholder_or_blank_key_falls_back_to_mock() {
        let provider = create_market_data_provider(
            None,
            &config("alpha_vantage", Some("your-alpha-vantage-api-key"), None),
        );
        assert_eq!(provider.id(), "MOCK");

        let provider = create_market_data_provider(
            None,
            &config("finnhub", None, Some("your-finnhub-api-key")),
        );
        assert_eq!(provider.id(), "MOCK");

        let provider = create_market_data_provider(None, &config("finnhub", None, Some("  ")));
        assert_eq!(provider.id(), "MOCK");

        let provider = create_market_data_provider(None, &config("finnhub", Some("k"), None));
        assert_eq!(provider.id(), "MOCK");
    }

    #[test]
    fn test_unknown_provider_falls_back_to_mock() {
        let provider = create_market_data_provider(None, &config("polygon", None, None));
        assert_eq!(provider.id(), "MOCK");
    }

    #[test]
    fn test_explicit_argument_wins() {
        let cfg = config("mock", None, Some("k"));
        let provider = create_market_data_provider(Some("finnhub"), &cfg);
        assert_eq!(provider.id(), "FINNHUB");
    }

    #[test]
    fn test_singleton_is_shared() {
        let first = get_market_data_provider();
        let second = get_market_data_provider();
        assert!(Arc::ptr_eq(&first, &second));

        // Seeding after first use keeps the existing instance
        let seeded = init_market_data_provider(&config("finnhub", None, Some("k")));
        assert!(Arc::ptr_eq(&first, &seeded));
    }
}
