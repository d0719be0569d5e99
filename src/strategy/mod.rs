pub mod sma_crossover;

use crate::portfolio::Position;

//strategy interface the simulator drives bar by bar
pub trait Strategy {
    //position the strategy wants at bar `index` given the one currently held
    //returns none while indicators are still warming up
    fn target(&self, index: usize, current: Position) -> Option<Position>;

    //returns the strategy name
    fn name(&self) -> &str;
}

//simple moving average over a whole series using a running sum
//entries before the window fills are none
pub fn rolling_sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }

    let mut sum = 0.0;
    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out[i] = Some(sum / window as f64);
        }
    }
    out
}
