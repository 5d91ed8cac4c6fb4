//! Daily OHLCV bars shared by the market-data client and the synthetic generator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily price/volume record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price columns checked for presence in a history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
}

impl PriceColumn {
    pub const ALL: [PriceColumn; 4] = [Self::Open, Self::High, Self::Low, Self::Close];

    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
        }
    }

    fn value(self, bar: &Bar) -> f64 {
        match self {
            Self::Open => bar.open,
            Self::High => bar.high,
            Self::Low => bar.low,
            Self::Close => bar.close,
        }
    }
}

/// Columns that carry no finite positive value in any bar
///
/// Yahoo fills gaps with zeros, so a column with only zeros is as good as
/// absent.
pub fn missing_columns(bars: &[Bar]) -> Vec<PriceColumn> {
    PriceColumn::ALL
        .into_iter()
        .filter(|column| {
            !bars.iter().any(|bar| {
                let value = column.value(bar);
                value.is_finite() && value > 0.0
            })
        })
        .collect()
}

#[cfg(feature = "indicators")]
mod ta_impls {
    use super::Bar;

    impl ta::Open for Bar {
        fn open(&self) -> f64 {
            self.open
        }
    }

    impl ta::High for Bar {
        fn high(&self) -> f64 {
            self.high
        }
    }

    impl ta::Low for Bar {
        fn low(&self) -> f64 {
            self.low
        }
    }

    impl ta::Close for Bar {
        fn close(&self) -> f64 {
            self.close
        }
    }

    impl ta::Volume for Bar {
        fn volume(&self) -> f64 {
            self.volume as f64
        }
    }
}
