use crate::config::MAParams;
use crate::data::Bar;
use crate::engine::execution::Trade;
use crate::metrics::{BacktestPoint, DrawdownTracker};
use crate::portfolio::Account;
use crate::strategy::{sma_crossover::SmaCrossover, Strategy};
use serde::{Deserialize, Serialize};
use tracing::trace;

//result of a backtest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub curve: Vec<BacktestPoint>,
    pub trades: Vec<Trade>,
    pub pnl: f64,    //ending equity, open position marked at the last close
    pub max_dd: f64, //absolute drawdown
    pub sharpe: f64, //placeholder, always 0
}

impl BacktestResult {
    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }
}

//runs the moving-average crossover over the bars
//invalid params or no bars give an empty result
pub fn backtest(bars: &[Bar], params: &MAParams) -> BacktestResult {
    if bars.is_empty() || !params.is_valid() {
        return BacktestResult::default();
    }

    let closes = crate::data::bar::closes(bars);
    let strategy = SmaCrossover::new(&closes, params.fast, params.slow);

    BacktestEngine::new(bars, params.cost_rate()).run(&strategy)
}

//bar-by-bar simulator, fills happen at the close of the signalling bar
pub struct BacktestEngine<'a> {
    bars: &'a [Bar],
    cost_rate: f64,
}

impl<'a> BacktestEngine<'a> {
    pub fn new(bars: &'a [Bar], cost_rate: f64) -> Self {
        BacktestEngine { bars, cost_rate }
    }

    //runs the backtest with the given strategy
    //bars the strategy has no opinion on (warm-up) are left out of the curve
    pub fn run(&self, strategy: &dyn Strategy) -> BacktestResult {
        let mut account = Account::new(self.cost_rate);
        let mut drawdown = DrawdownTracker::new();
        let mut curve = Vec::with_capacity(self.bars.len());
        let mut equity = 0.0;

        for (i, bar) in self.bars.iter().enumerate() {
            let Some(target) = strategy.target(i, account.position) else {
                continue;
            };

            account.rebalance(i, bar, target);

            equity = account.equity(bar.close);
            drawdown.update(equity);

            curve.push(BacktestPoint::new(i, bar.ts_ms, bar.close, equity));
        }

        trace!(
            strategy = strategy.name(),
            points = curve.len(),
            trades = account.trade_log.len(),
            pnl = equity,
            "backtest finished"
        );

        BacktestResult {
            curve,
            trades: account.trade_log,
            pnl: equity,
            max_dd: drawdown.max_drawdown(),
            sharpe: 0.0,
        }
    }
}
