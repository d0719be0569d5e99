use crate::engine::execution::{OrderSide, Trade};
use crate::engine::BacktestResult;
use crate::metrics::timeseries::BacktestPoint;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary metrics for a backtest
//round trips are priced pre-cost, costs only show up in final_equity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub bars_evaluated: usize,
    pub final_equity: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub num_trades: usize,
    pub num_round_trips: usize,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
    pub win_rate: f64,
    pub avg_round_trip: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub exposure: f64,
    pub open_at_end: bool,
}

impl SummaryMetrics {
    //calculate summary metrics from a backtest result
    pub fn from_result(result: &BacktestResult) -> Self {
        let round_trips = round_trip_pnls(&result.trades);

        let winners: Vec<f64> = round_trips.iter().copied().filter(|&p| p > 0.0).collect();
        let losers: Vec<f64> = round_trips.iter().copied().filter(|&p| p < 0.0).collect();

        let win_rate = if round_trips.is_empty() {
            0.0
        } else {
            winners.len() as f64 / round_trips.len() as f64
        };

        let avg_round_trip = if round_trips.is_empty() {
            0.0
        } else {
            round_trips.iter().mean()
        };

        SummaryMetrics {
            bars_evaluated: result.curve.len(),
            final_equity: result.pnl,
            max_drawdown: result.max_dd,
            sharpe_ratio: result.sharpe,
            num_trades: result.trades.len(),
            num_round_trips: round_trips.len(),
            num_winning_trades: winners.len(),
            num_losing_trades: losers.len(),
            win_rate,
            avg_round_trip,
            largest_win: winners.iter().fold(0.0f64, |a, &b| a.max(b)),
            largest_loss: losers.iter().fold(0.0f64, |a, &b| a.min(b)),
            exposure: calculate_exposure(&result.curve, &result.trades),
            open_at_end: result.trades.last().is_some_and(|t| t.side == OrderSide::Buy),
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        let rows = [
            ("Bars Evaluated", format!("{}", self.bars_evaluated)),
            ("Final Equity (PnL)", format!("{:.4}", self.final_equity)),
            ("Max Drawdown", format!("{:.4}", self.max_drawdown)),
            ("Sharpe (placeholder)", format!("{:.3}", self.sharpe_ratio)),
            ("Number of Trades", format!("{}", self.num_trades)),
            ("Round Trips", format!("{}", self.num_round_trips)),
            ("Win Rate", format!("{:.2}%", self.win_rate * 100.0)),
            ("Avg Round Trip", format!("{:.4}", self.avg_round_trip)),
            ("Largest Win", format!("{:.4}", self.largest_win)),
            ("Largest Loss", format!("{:.4}", self.largest_loss)),
            ("Exposure", format!("{:.2}%", self.exposure * 100.0)),
            ("Open At End", format!("{}", self.open_at_end)),
        ];

        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }

        table.printstd();
    }
}

//pairs each buy with the following sell
//a trailing buy with no sell is still open and not counted
fn round_trip_pnls(trades: &[Trade]) -> Vec<f64> {
    let mut pnls = Vec::new();
    let mut entry: Option<f64> = None;

    for trade in trades {
        match trade.side {
            OrderSide::Buy => entry = Some(trade.price),
            OrderSide::Sell => {
                if let Some(entry_price) = entry.take() {
                    pnls.push(trade.price - entry_price);
                }
            }
        }
    }
    pnls
}

//fraction of curve points spent long
//trades are matched to points by bar index, timestamps may repeat or go backwards
fn calculate_exposure(curve: &[BacktestPoint], trades: &[Trade]) -> f64 {
    if curve.is_empty() {
        return 0.0;
    }

    let mut in_market_count = 0;
    let mut long = false;
    let mut trade_idx = 0;

    for point in curve {
        //apply trades up to this bar
        while trade_idx < trades.len() && trades[trade_idx].idx <= point.idx {
            long = trades[trade_idx].side == OrderSide::Buy;
            trade_idx += 1;
        }

        if long {
            in_market_count += 1;
        }
    }

    in_market_count as f64 / curve.len() as f64
}
