use crate::portfolio::Position;
use crate::strategy::{rolling_sma, Strategy};

//sma crossover strategy, long-only
//goes long when fast sma is above slow sma while flat
//goes flat when fast sma is below slow sma while long
//equal averages hold whatever is currently held
#[derive(Debug, Clone)]
pub struct SmaCrossover {
    fast_sma: Vec<Option<f64>>,
    slow_sma: Vec<Option<f64>>,
}

impl SmaCrossover {
    //precomputes both averages over the closing prices
    pub fn new(closes: &[f64], fast_window: usize, slow_window: usize) -> Self {
        SmaCrossover {
            fast_sma: rolling_sma(closes, fast_window),
            slow_sma: rolling_sma(closes, slow_window),
        }
    }

    //both averages at bar `index`, none during warm-up
    pub fn averages(&self, index: usize) -> Option<(f64, f64)> {
        let fast = (*self.fast_sma.get(index)?)?;
        let slow = (*self.slow_sma.get(index)?)?;
        Some((fast, slow))
    }
}

impl Strategy for SmaCrossover {
    fn target(&self, index: usize, current: Position) -> Option<Position> {
        let (fast, slow) = self.averages(index)?;

        let target = match current {
            Position::Flat if fast > slow => Position::Long,
            Position::Long if fast < slow => Position::Flat,
            held => held,
        };
        Some(target)
    }

    fn name(&self) -> &str {
        "SMA Crossover"
    }
}
