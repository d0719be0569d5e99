pub mod summary;
pub mod timeseries;

pub use summary::SummaryMetrics;
pub use timeseries::{drawdown_series, BacktestPoint, DrawdownTracker};
