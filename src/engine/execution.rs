use serde::{Deserialize, Serialize};

//order side (buy or sell)
//long-only: buy opens the position, sell closes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    //converts to direction sign (Buy = +1, Sell = -1)
    pub fn to_qty_sign(&self) -> i32 {
        match self {
            OrderSide::Buy => 1,
            OrderSide::Sell => -1,
        }
    }

    //price actually paid or received once costs are applied
    //buys pay price * (1 + rate), sells receive price * (1 - rate)
    pub fn costed_price(&self, price: f64, cost_rate: f64) -> f64 {
        match self {
            OrderSide::Buy => price * (1.0 + cost_rate),
            OrderSide::Sell => price * (1.0 - cost_rate),
        }
    }
}

//one position change in the trade log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub idx: usize,  //bar index in the input series
    pub ts_ms: i64,  //timestamp of that bar
    pub price: f64,  //pre-cost fill price
    pub side: OrderSide,
}

impl Trade {
    pub fn new(idx: usize, ts_ms: i64, price: f64, side: OrderSide) -> Self {
        Trade {
            idx,
            ts_ms,
            price,
            side,
        }
    }

    //+1 for an open (buy), -1 for a close (sell)
    pub fn dir(&self) -> i32 {
        self.side.to_qty_sign()
    }
}
