use serde::{Deserialize, Serialize};

//a point in the equity curve, idx is the bar it was marked on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestPoint {
    pub idx: usize,
    pub ts_ms: i64,
    pub price: f64,
    pub equity: f64,
}

impl BacktestPoint {
    pub fn new(idx: usize, ts_ms: i64, price: f64, equity: f64) -> Self {
        BacktestPoint {
            idx,
            ts_ms,
            price,
            equity,
        }
    }
}

//running peak and maximum absolute drawdown
//the peak starts at zero, the equity of an untouched account
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawdownTracker {
    peak: f64,
    max_drawdown: f64,
}

impl DrawdownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //feeds one equity value, returns the max drawdown so far
    pub fn update(&mut self, equity: f64) -> f64 {
        self.peak = self.peak.max(equity);
        self.max_drawdown = self.max_drawdown.max(self.peak - equity);
        self.max_drawdown
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }
}

//running max drawdown at every point of the curve
pub fn drawdown_series(curve: &[BacktestPoint]) -> Vec<f64> {
    let mut tracker = DrawdownTracker::new();
    curve.iter().map(|point| tracker.update(point.equity)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_absolute_drawdown_from_peak() {
        let mut tracker = DrawdownTracker::new();
        assert_eq!(tracker.update(5.0), 0.0);
        assert_eq!(tracker.update(2.0), 3.0);
        assert_eq!(tracker.update(8.0), 3.0);
        assert_eq!(tracker.update(1.0), 7.0);
        assert_eq!(tracker.peak(), 8.0);
    }

    #[test]
    fn negative_start_counts_from_zero_peak() {
        let mut tracker = DrawdownTracker::new();
        assert_eq!(tracker.update(-0.5), 0.5);
        assert_eq!(tracker.peak(), 0.0);
    }

    #[test]
    fn series_is_non_decreasing() {
        let curve: Vec<BacktestPoint> = [0.0, 3.0, 1.0, 4.0, -2.0, 5.0]
            .iter()
            .enumerate()
            .map(|(i, &eq)| BacktestPoint::new(i, i as i64, 1.0, eq))
            .collect();
        let series = drawdown_series(&curve);
        assert_eq!(series, vec![0.0, 0.0, 2.0, 2.0, 6.0, 6.0]);
    }
}
