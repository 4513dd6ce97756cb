//! Static exchange tables for Finnhub search results.
//!
//! Finnhub identifies non-US listings by a dotted ticker suffix
//! (`SHOP.TO`). The suffix maps to an exchange code, which in turn maps to
//! a country and trading currency.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Exchange code used for listings without a suffix.
pub const DEFAULT_EXCHANGE: &str = "US";
const DEFAULT_COUNTRY: &str = "US";
const DEFAULT_CURRENCY: &str = "USD";

lazy_static! {
    static ref SUFFIX_TO_EXCHANGE: HashMap<&'static str, &'static str> = HashMap::from([
        ("TO", "TSX"),
        ("V", "TSXV"),
        ("L", "LSE"),
        ("AS", "AMS"),
        ("PA", "EPA"),
        ("DE", "XETRA"),
        ("F", "FRA"),
        ("MI", "BIT"),
        ("MC", "BME"),
        ("SW", "SIX"),
        ("HK", "HKEX"),
        ("T", "TSE"),
        ("SS", "SSE"),
        ("SZ", "SZSE"),
        ("AX", "ASX"),
        ("NS", "NSE"),
        ("BO", "BSE"),
        ("SA", "B3"),
        ("KS", "KRX"),
        ("TW", "TWSE"),
    ]);

    /// Exchange code to (country, currency)
    static ref EXCHANGE_LOCALE: HashMap<&'static str, (&'static str, &'static str)> =
        HashMap::from([
            ("US", ("US", "USD")),
            ("NASDAQ", ("US", "USD")),
            ("NYSE", ("US", "USD")),
            ("TSX", ("CA", "CAD")),
            ("TSXV", ("CA", "CAD")),
            ("LSE", ("GB", "GBP")),
            ("AMS", ("NL", "EUR")),
            ("EPA", ("FR", "EUR")),
            ("XETRA", ("DE", "EUR")),
            ("FRA", ("DE", "EUR")),
            ("BIT", ("IT", "EUR")),
            ("BME", ("ES", "EUR")),
            ("SIX", ("CH", "CHF")),
            ("HKEX", ("HK", "HKD")),
            ("TSE", ("JP", "JPY")),
            ("SSE", ("CN", "CNY")),
            ("SZSE", ("CN", "CNY")),
            ("ASX", ("AU", "AUD")),
            ("NSE", ("IN", "INR")),
            ("BSE", ("IN", "INR")),
            ("B3", ("BR", "BRL")),
            ("KRX", ("KR", "KRW")),
            ("TWSE", ("TW", "TWD")),
        ]);
}

/// Infer the exchange from a display symbol's dotted suffix.
///
/// Unknown suffixes are returned verbatim (upper-cased); symbols without a
/// suffix are US listings.
pub fn exchange_for_symbol(display_symbol: &str) -> String {
    match display_symbol.rsplit_once('.') {
        Some((_, suffix)) if !suffix.is_empty() => {
            let suffix = suffix.to_uppercase();
            SUFFIX_TO_EXCHANGE
                .get(suffix.as_str())
                .map(|exchange| exchange.to_string())
                .unwrap_or(suffix)
        }
        _ => DEFAULT_EXCHANGE.to_string(),
    }
}

/// Country code for an exchange, defaulting to "US".
pub fn exchange_country(exchange: &str) -> &'static str {
    EXCHANGE_LOCALE
        .get(exchange)
        .map(|(country, _)| *country)
        .unwrap_or(DEFAULT_COUNTRY)
}

/// Trading currency for an exchange, defaulting to "USD".
pub fn exchange_currency(exchange: &str) -> &'static str {
    EXCHANGE_LOCALE
        .get(exchange)
        .map(|(_, currency)| *currency)
        .unwrap_or(DEFAULT_CURRENCY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_symbol_is_us() {
        assert_eq!(exchange_for_symbol("AAPL"), "US");
        assert_eq!(exchange_country("US"), "US");
        assert_eq!(exchange_currency("US"), "USD");
    }

    #[test]
    fn test_known_suffixes() {
        assert_eq!(exchange_for_symbol("SHOP.TO"), "TSX");
        assert_eq!(exchange_for_symbol("VOD.L"), "LSE");
        assert_eq!(exchange_for_symbol("7203.T"), "TSE");
        assert_eq!(exchange_country("TSX"), "CA");
        assert_eq!(exchange_currency("TSX"), "CAD");
        assert_eq!(exchange_currency("SIX"), "CHF");
    }

    #[test]
    fn test_lowercase_suffix() {
        assert_eq!(exchange_for_symbol("sap.de"), "XETRA");
    }

    #[test]
    fn test_unknown_suffix_passes_through_with_us_defaults() {
        assert_eq!(exchange_for_symbol("ABC.XX"), "XX");
        assert_eq!(exchange_country("XX"), "US");
        assert_eq!(exchange_currency("XX"), "USD");
    }
}
