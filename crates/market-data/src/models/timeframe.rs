use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Chart range a caller may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::OneYear,
        Timeframe::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::OneYear => "1Y",
            Timeframe::FiveYears => "5Y",
        }
    }

    /// Nominal calendar span covered by the range.
    pub fn span(&self) -> Duration {
        match self {
            Timeframe::OneDay => Duration::days(1),
            Timeframe::OneWeek => Duration::days(7),
            Timeframe::OneMonth => Duration::days(30),
            Timeframe::ThreeMonths => Duration::days(91),
            Timeframe::OneYear => Duration::days(365),
            Timeframe::FiveYears => Duration::days(1826),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MarketDataError::UnsupportedTimeframe(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_codes() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
        assert_eq!("3m".parse::<Timeframe>().unwrap(), Timeframe::ThreeMonths);
    }

    #[test]
    fn test_parse_unknown_is_unsupported() {
        let err = "10Y".parse::<Timeframe>().unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedTimeframe(ref s) if s == "10Y"));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Timeframe::FiveYears).unwrap(), "\"5Y\"");
        let tf: Timeframe = serde_json::from_str("\"1W\"").unwrap();
        assert_eq!(tf, Timeframe::OneWeek);
    }
}
