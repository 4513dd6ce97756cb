use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bar of a historical price series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

/// Sort a series ascending by timestamp and drop repeated timestamps.
///
/// The first bar seen for a timestamp wins.
pub fn normalize_series(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    candles.dedup_by_key(|c| c.timestamp);
    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn bar(day: u32, close: Decimal) -> Candle {
        Candle {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1,
        }
    }

    #[test]
    fn test_normalize_sorts_ascending() {
        let series = normalize_series(vec![bar(3, dec!(3)), bar(1, dec!(1)), bar(2, dec!(2))]);
        let days: Vec<_> = series.iter().map(|c| c.close).collect();
        assert_eq!(days, vec![dec!(1), dec!(2), dec!(3)]);
    }

    #[test]
    fn test_normalize_drops_duplicate_timestamps() {
        let series = normalize_series(vec![bar(2, dec!(2)), bar(2, dec!(20)), bar(1, dec!(1))]);
        assert_eq!(series.len(), 2);
        assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }
}
