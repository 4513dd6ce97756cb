//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Vendors that report failures inside a 200 OK body are translated into
/// these variants at the provider boundary, so a caller never receives a
/// parsed-but-meaningless quote.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The vendor refused the call because of its rate limit, either with
    /// HTTP 429 or an in-body notice.
    #[error("Rate limited: {provider}")]
    VendorRateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The response did not have the expected payload shape.
    #[error("Invalid response from {provider}: {message}")]
    VendorInvalidResponse {
        /// The provider that sent the response
        provider: String,
        /// What was missing or malformed
        message: String,
    },

    /// The vendor reported an error (bad symbol, bad key, non-2xx status).
    #[error("Provider error: {provider} - {message}")]
    VendorError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The symbol has no tradable price.
    #[error("No quote data for {0}")]
    NoQuoteData(String),

    /// The request never produced a response.
    #[error("Network error: {provider} - {message}")]
    NetworkFailure {
        /// The provider being called
        provider: String,
        /// Transport error description
        message: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A timeframe code outside the supported set.
    #[error("Unsupported timeframe: {0}")]
    UnsupportedTimeframe(String),
}

impl MarketDataError {
    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::VendorRateLimited { .. } | Self::NetworkFailure { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_is_transient() {
        let error = MarketDataError::VendorRateLimited {
            provider: "ALPHA_VANTAGE".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_timeout_is_transient() {
        let error = MarketDataError::Timeout {
            provider: "FINNHUB".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_no_quote_data_is_terminal() {
        let error = MarketDataError::NoQuoteData("INVALID".to_string());
        assert!(!error.is_transient());
    }

    #[test]
    fn test_invalid_response_is_terminal() {
        let error = MarketDataError::VendorInvalidResponse {
            provider: "ALPHA_VANTAGE".to_string(),
            message: "missing Global Quote".to_string(),
        };
        assert!(!error.is_transient());
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::NoQuoteData("INVALID".to_string());
        assert_eq!(format!("{}", error), "No quote data for INVALID");

        let error = MarketDataError::VendorRateLimited {
            provider: "FINNHUB".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: FINNHUB");

        let error = MarketDataError::VendorError {
            provider: "ALPHA_VANTAGE".to_string(),
            message: "Invalid API call".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: ALPHA_VANTAGE - Invalid API call"
        );
    }
}
