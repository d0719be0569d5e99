pub mod backtest;
pub mod execution;

pub use backtest::{backtest, BacktestEngine, BacktestResult};
pub use execution::{OrderSide, Trade};
