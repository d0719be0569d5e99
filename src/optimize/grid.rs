use crate::config::MAParams;
use crate::data::{self, Bar};
use crate::engine::{backtest, BacktestResult};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, info, info_span, warn};

//best (fast, slow) pair found by a grid search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptResult {
    pub best_fast: usize,
    pub best_slow: usize,
    pub best_score: f64,
}

impl OptResult {
    //winning windows with the costs of `base`
    pub fn params(&self, base: &MAParams) -> MAParams {
        base.with_windows(self.best_fast, self.best_slow)
    }
}

//full outcome of a grid search
#[derive(Debug, Clone, Default)]
pub struct GridReport {
    pub best: Option<OptResult>,
    //mean score per evaluated cell, in iteration order
    pub scores: IndexMap<(usize, usize), f64>,
    pub datasets: usize,
}

impl GridReport {
    //the n best cells, ties keep iteration order
    pub fn top(&self, n: usize) -> Vec<((usize, usize), f64)> {
        let mut ranked: Vec<((usize, usize), f64)> =
            self.scores.iter().map(|(&cell, &score)| (cell, score)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

//drawdown-penalized return
//negative pnl with a large drawdown can outrank a small positive one
pub fn score(result: &BacktestResult) -> f64 {
    result.pnl / (1.0 + result.max_dd)
}

//grid search over fast/slow windows against preloaded datasets
pub struct GridSearch {
    datasets: Vec<Vec<Bar>>,
    base: MAParams,
    fast: RangeInclusive<usize>,
    slow: RangeInclusive<usize>,
    parallel: bool,
}

impl GridSearch {
    //empty datasets are dropped from the pool
    pub fn new(datasets: Vec<Vec<Bar>>, base: MAParams) -> Self {
        let datasets: Vec<Vec<Bar>> = datasets.into_iter().filter(|d| !d.is_empty()).collect();
        GridSearch {
            datasets,
            base,
            fast: base.fast..=base.fast,
            slow: base.slow..=base.slow,
            parallel: true,
        }
    }

    //loads every path once, files that fail or hold no bars are skipped
    pub fn from_paths<P: AsRef<Path>>(paths: &[P], base: MAParams) -> Self {
        let mut datasets = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            match data::load(path) {
                Ok(loaded) if loaded.is_empty() => {
                    warn!(path = %path.display(), "dataset has no bars, skipping");
                }
                Ok(loaded) => datasets.push(loaded.into_bars()),
                Err(error) => {
                    warn!(path = %path.display(), %error, "dataset failed to load, skipping");
                }
            }
        }

        Self::new(datasets, base)
    }

    pub fn with_ranges(mut self, fast: RangeInclusive<usize>, slow: RangeInclusive<usize>) -> Self {
        self.fast = fast;
        self.slow = slow;
        self
    }

    //enables or disables parallel evaluation
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    //every (fast, slow) cell in iteration order
    //fast starts at 1 at the least and slow always exceeds fast
    pub fn cells(&self) -> Vec<(usize, usize)> {
        let fast_min = (*self.fast.start()).max(1);
        let mut cells = Vec::new();

        for fast in fast_min..=*self.fast.end() {
            let slow_min = (*self.slow.start()).max(fast.saturating_add(1));
            for slow in slow_min..=*self.slow.end() {
                cells.push((fast, slow));
            }
        }
        cells
    }

    //mean score of one cell across the pool
    //non-finite dataset scores are left out, none if nothing was usable
    pub fn evaluate(&self, fast: usize, slow: usize) -> Option<f64> {
        let params = self.base.with_windows(fast, slow);

        let (total, used) = self
            .datasets
            .iter()
            .map(|bars| score(&backtest(bars, &params)))
            .filter(|s| s.is_finite())
            .fold((0.0, 0usize), |(total, used), s| (total + s, used + 1));

        if used == 0 {
            return None;
        }
        Some(total / used as f64)
    }

    //runs the search, returns only the best pair
    pub fn run(&self) -> Option<OptResult> {
        self.run_with_scores().best
    }

    //runs the search and keeps the whole score surface
    pub fn run_with_scores(&self) -> GridReport {
        let mut report = GridReport {
            datasets: self.datasets.len(),
            ..GridReport::default()
        };
        if self.datasets.is_empty() {
            warn!("no usable datasets, grid search skipped");
            return report;
        }

        let cells = self.cells();
        let _span = info_span!("grid_search", datasets = self.datasets.len(), cells = cells.len())
            .entered();

        //collect keeps cell order, so the reduction below is the same either way
        let evaluated: Vec<((usize, usize), Option<f64>)> = if self.parallel {
            cells
                .par_iter()
                .map(|&(fast, slow)| ((fast, slow), self.evaluate(fast, slow)))
                .collect()
        } else {
            cells
                .iter()
                .map(|&(fast, slow)| ((fast, slow), self.evaluate(fast, slow)))
                .collect()
        };

        for ((fast, slow), mean) in evaluated {
            let Some(mean) = mean else {
                debug!(fast, slow, "no finite score");
                continue;
            };
            report.scores.insert((fast, slow), mean);

            //strictly greater replaces, first seen wins ties
            if report.best.map_or(true, |best| mean > best.best_score) {
                report.best = Some(OptResult {
                    best_fast: fast,
                    best_slow: slow,
                    best_score: mean,
                });
            }
        }

        match report.best {
            Some(best) => info!(
                fast = best.best_fast,
                slow = best.best_slow,
                score = best.best_score,
                evaluated = report.scores.len(),
                "grid search finished"
            ),
            None => info!("grid search found no valid combination"),
        }

        report
    }
}

//loads the paths once and returns the best pair over the ranges
//none when no dataset loads or no valid combination exists
pub fn optimize<P: AsRef<Path>>(
    paths: &[P],
    base: &MAParams,
    fast: RangeInclusive<usize>,
    slow: RangeInclusive<usize>,
) -> Option<OptResult> {
    GridSearch::from_paths(paths, *base)
        .with_ranges(fast, slow)
        .run()
}
