pub mod grid;

pub use grid::{optimize, score, GridReport, GridSearch, OptResult};
