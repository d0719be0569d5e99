use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

//fatal ingestion errors, the load yields no bars
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Empty file: {0:?}")]
    EmptyFile(PathBuf),
    #[error("Unrecognized header: {0}")]
    UnrecognizedHeader(String),
    #[error("Failed to read input: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to split CSV line: {0}")]
    Csv(#[from] csv::Error),
}

//recoverable row-level defects, the load continues
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowWarning {
    #[error("Malformed line {line}")]
    MalformedRow { line: u64 },
    #[error("Numeric parse error at line {line}")]
    BadNumeric { line: u64 },
    #[error("Bad date at line {line}")]
    BadDate { line: u64 },
    #[error("Non-monotonic ts at line {line}")]
    NonMonotonic { line: u64 },
}

impl RowWarning {
    pub fn line(&self) -> u64 {
        match *self {
            RowWarning::MalformedRow { line }
            | RowWarning::BadNumeric { line }
            | RowWarning::BadDate { line }
            | RowWarning::NonMonotonic { line } => line,
        }
    }
}

//keeps only the most recent warning plus a running count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub last_warning: Option<RowWarning>,
    pub warning_count: usize,
}

impl Diagnostics {
    pub fn record(&mut self, warning: RowWarning) {
        debug!(line = warning.line(), %warning, "row warning");
        self.last_warning = Some(warning);
        self.warning_count += 1;
    }

    pub fn is_clean(&self) -> bool {
        self.warning_count == 0
    }
}
