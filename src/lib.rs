//a Rust-based moving-average crossover backtester and grid-search optimizer

pub mod config;
pub mod data;
pub mod engine;
pub mod metrics;
pub mod optimize;
pub mod portfolio;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{MAParams, StudioConfiguration, WindowRange};
    pub use crate::data::{load, load_from_reader, Bar, LoadError, LoadedBars, RowWarning, Schema};
    pub use crate::engine::{backtest, BacktestEngine, BacktestResult, OrderSide, Trade};
    pub use crate::metrics::{drawdown_series, BacktestPoint, DrawdownTracker, SummaryMetrics};
    pub use crate::optimize::{optimize, score, GridReport, GridSearch, OptResult};
    pub use crate::portfolio::{Account, Position};
    pub use crate::strategy::{rolling_sma, sma_crossover::SmaCrossover, Strategy};
}
