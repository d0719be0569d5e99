use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//represents a single ohlcv bar (candlestick) of market data
//timestamps are milliseconds since the unix epoch, utc
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub ts_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(ts_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Bar {
            ts_ms,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    //returns the timestamp as a utc datetime, none if out of chrono's range
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.ts_ms)
    }
}

//returns the closing prices of a bar sequence
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|bar| bar.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_converts_epoch_millis() {
        let bar = Bar::new(1_757_635_200_000, 1.0, 2.0, 0.5, 1.5, 10.0);
        let dt = bar.datetime().unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2025-09-12");
    }

    #[test]
    fn closes_keep_bar_order() {
        let bars = vec![
            Bar::new(1, 0.0, 0.0, 0.0, 3.0, 0.0),
            Bar::new(2, 0.0, 0.0, 0.0, 1.0, 0.0),
        ];
        assert_eq!(closes(&bars), vec![3.0, 1.0]);
    }
}
