use crate::data::Bar;
use crate::engine::execution::{OrderSide, Trade};
use crate::portfolio::position::Position;

//cash account holding at most one unit of the instrument
//cash starts at zero, so equity reads directly as profit and loss
#[derive(Debug, Clone)]
pub struct Account {
    //current cash (goes negative while long)
    pub cash: f64,

    //current holding
    pub position: Position,

    //complete trade log
    pub trade_log: Vec<Trade>,

    //fee + slippage as a fraction of price, per side
    pub cost_rate: f64,
}

impl Account {
    pub fn new(cost_rate: f64) -> Self {
        Account {
            cash: 0.0,
            position: Position::Flat,
            trade_log: Vec::new(),
            cost_rate,
        }
    }

    //fills at the bar's close, updates cash and position, logs the trade
    pub fn process_fill(&mut self, idx: usize, bar: &Bar, side: OrderSide) {
        let costed = side.costed_price(bar.close, self.cost_rate);
        match side {
            OrderSide::Buy => self.cash -= costed,
            OrderSide::Sell => self.cash += costed,
        }

        self.position = self.position.after(side);
        self.trade_log.push(Trade::new(idx, bar.ts_ms, bar.close, side));
    }

    //moves toward `target`, returns true if a fill happened
    pub fn rebalance(&mut self, idx: usize, bar: &Bar, target: Position) -> bool {
        match self.position.transition_to(target) {
            Some(side) => {
                self.process_fill(idx, bar, side);
                true
            }
            None => false,
        }
    }

    //cash plus the holding marked at `price`
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.position.units() * price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts_ms: i64, close: f64) -> Bar {
        Bar::new(ts_ms, close, close, close, close, 0.0)
    }

    #[test]
    fn round_trip_pays_costs_both_ways() {
        let mut account = Account::new(0.01);

        assert!(account.rebalance(0, &bar(1, 100.0), Position::Long));
        assert!((account.cash + 101.0).abs() < 1e-9);
        assert!((account.equity(100.0) + 1.0).abs() < 1e-9);

        assert!(account.rebalance(1, &bar(2, 110.0), Position::Flat));
        assert!((account.cash - (108.9 - 101.0)).abs() < 1e-9);
        assert!(account.position.is_flat());

        let sides: Vec<OrderSide> = account.trade_log.iter().map(|t| t.side).collect();
        assert_eq!(sides, vec![OrderSide::Buy, OrderSide::Sell]);
        assert_eq!(account.trade_log[1].price, 110.0);
        assert_eq!(account.trade_log[1].ts_ms, 2);
    }

    #[test]
    fn rebalance_to_current_position_is_a_no_op() {
        let mut account = Account::new(0.0);
        assert!(!account.rebalance(0, &bar(1, 10.0), Position::Flat));
        assert!(account.trade_log.is_empty());
        assert_eq!(account.equity(10.0), 0.0);
    }
}
