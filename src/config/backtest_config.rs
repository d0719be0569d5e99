use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;

//moving-average crossover parameters
//a run needs 0 < fast < slow, costs are per trade in basis points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MAParams {
    pub fast: usize,
    pub slow: usize,
    pub fee_bps: f64,
    pub slippage_bps: f64,
}

impl Default for MAParams {
    fn default() -> Self {
        MAParams {
            fast: 20,
            slow: 50,
            fee_bps: 1.0,
            slippage_bps: 2.0,
        }
    }
}

impl MAParams {
    pub fn new(fast: usize, slow: usize, fee_bps: f64, slippage_bps: f64) -> Self {
        MAParams {
            fast,
            slow,
            fee_bps,
            slippage_bps,
        }
    }

    //same costs, different windows
    pub fn with_windows(&self, fast: usize, slow: usize) -> Self {
        MAParams { fast, slow, ..*self }
    }

    pub fn is_valid(&self) -> bool {
        self.fast > 0 && self.fast < self.slow
    }

    //combined fee + slippage as a fraction of price
    pub fn cost_rate(&self) -> f64 {
        (self.fee_bps + self.slippage_bps) / 10_000.0
    }
}

//inclusive window-length range for the grid search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRange {
    pub min: usize,
    pub max: usize,
}

impl WindowRange {
    pub fn new(min: usize, max: usize) -> Self {
        WindowRange { min, max }
    }

    pub fn as_range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

//complete optimizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfiguration {
    //data
    pub data_paths: Vec<PathBuf>,

    //costs (and default windows for single runs)
    pub params: MAParams,

    //grid
    pub fast_range: WindowRange,
    pub slow_range: WindowRange,

    //evaluate grid cells on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for StudioConfiguration {
    fn default() -> Self {
        StudioConfiguration {
            data_paths: Vec::new(),
            params: MAParams::default(),
            fast_range: WindowRange::new(5, 30),
            slow_range: WindowRange::new(20, 120),
            parallel: true,
        }
    }
}

impl StudioConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: StudioConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
