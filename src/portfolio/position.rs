use crate::engine::execution::OrderSide;
use serde::{Deserialize, Serialize};

//single-instrument, single-unit position: flat or fully invested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl Position {
    //units held (0 or 1)
    pub fn units(&self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }

    //returns true if the position is flat (no open position)
    pub fn is_flat(&self) -> bool {
        *self == Position::Flat
    }

    //returns true if the position is long
    pub fn is_long(&self) -> bool {
        *self == Position::Long
    }

    //order needed to move from this position to `target`, none if already there
    pub fn transition_to(&self, target: Position) -> Option<OrderSide> {
        match (self, target) {
            (Position::Flat, Position::Long) => Some(OrderSide::Buy),
            (Position::Long, Position::Flat) => Some(OrderSide::Sell),
            _ => None,
        }
    }

    //position after a fill on the given side
    pub fn after(&self, side: OrderSide) -> Position {
        match side {
            OrderSide::Buy => Position::Long,
            OrderSide::Sell => Position::Flat,
        }
    }
}
