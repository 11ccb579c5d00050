//! Kline (candlestick) types.

use crate::error::{RestError, RestResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use triarb_core::Price;

/// Supported candle intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KlineInterval {
    #[serde(rename = "1min")]
    Min1,
    #[serde(rename = "5min")]
    Min5,
    #[serde(rename = "15min")]
    Min15,
    #[serde(rename = "30min")]
    Min30,
    #[serde(rename = "1hour")]
    Hour1,
    #[serde(rename = "4hour")]
    Hour4,
    #[serde(rename = "1day")]
    Day1,
}

impl KlineInterval {
    /// Query-parameter form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min1 => "1min",
            Self::Min5 => "5min",
            Self::Min15 => "15min",
            Self::Min30 => "30min",
            Self::Hour1 => "1hour",
            Self::Hour4 => "4hour",
            Self::Day1 => "1day",
        }
    }

    /// Candle width in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Self::Min1 => 60,
            Self::Min5 => 300,
            Self::Min15 => 900,
            Self::Min30 => 1_800,
            Self::Hour1 => 3_600,
            Self::Hour4 => 14_400,
            Self::Day1 => 86_400,
        }
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KlineInterval {
    type Err = RestError;

    fn from_str(s: &str) -> RestResult<Self> {
        match s {
            "1min" => Ok(Self::Min1),
            "5min" => Ok(Self::Min5),
            "15min" => Ok(Self::Min15),
            "30min" => Ok(Self::Min30),
            "1hour" => Ok(Self::Hour1),
            "4hour" => Ok(Self::Hour4),
            "1day" => Ok(Self::Day1),
            other => Err(RestError::Decode(format!("unknown interval: {other}"))),
        }
    }
}

/// One candle.
///
/// The API returns candles as positional string arrays:
/// `[time, open, close, high, low, volume, turnover]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Candle open time, unix seconds.
    pub time: i64,
    pub open: Price,
    pub close: Price,
    pub high: Price,
    pub low: Price,
    pub volume: Decimal,
    pub turnover: Decimal,
}

impl Kline {
    /// Decode one positional row.
    pub fn from_row(row: &[String]) -> RestResult<Self> {
        if row.len() < 7 {
            return Err(RestError::Decode(format!(
                "kline row has {} fields, expected 7",
                row.len()
            )));
        }
        let decimal = |i: usize| -> RestResult<Decimal> {
            row[i]
                .parse::<Decimal>()
                .map_err(|e| RestError::Decode(format!("field {i} ({}): {e}", row[i])))
        };
        Ok(Self {
            time: row[0]
                .parse::<i64>()
                .map_err(|e| RestError::Decode(format!("time ({}): {e}", row[0])))?,
            open: Price::new(decimal(1)?),
            close: Price::new(decimal(2)?),
            high: Price::new(decimal(3)?),
            low: Price::new(decimal(4)?),
            volume: decimal(5)?,
            turnover: decimal(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_row() {
        let kline = Kline::from_row(&row(&[
            "1700000000",
            "50000.1",
            "50100.2",
            "50200.3",
            "49900.4",
            "12.5",
            "626253.75",
        ]))
        .unwrap();
        assert_eq!(kline.time, 1_700_000_000);
        assert_eq!(kline.open.inner(), dec!(50000.1));
        assert_eq!(kline.close.inner(), dec!(50100.2));
        assert_eq!(kline.volume, dec!(12.5));
    }

    #[test]
    fn test_short_row_rejected() {
        let result = Kline::from_row(&row(&["1700000000", "50000"]));
        assert!(matches!(result, Err(RestError::Decode(_))));
    }

    #[test]
    fn test_bad_number_rejected() {
        let result = Kline::from_row(&row(&[
            "1700000000",
            "fifty",
            "50100",
            "50200",
            "49900",
            "12.5",
            "626253",
        ]));
        assert!(matches!(result, Err(RestError::Decode(_))));
    }

    #[test]
    fn test_interval_round_trip() {
        for interval in [
            KlineInterval::Min1,
            KlineInterval::Hour4,
            KlineInterval::Day1,
        ] {
            assert_eq!(interval.as_str().parse::<KlineInterval>().unwrap(), interval);
        }
        assert!("7min".parse::<KlineInterval>().is_err());
    }

    #[test]
    fn test_interval_seconds() {
        assert_eq!(KlineInterval::Min1.seconds(), 60);
        assert_eq!(KlineInterval::Day1.seconds(), 86_400);
    }
}
