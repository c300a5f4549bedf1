use crate::models::REQUIRED_COLUMNS;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the path valuation pipeline
#[derive(Debug, Error)]
pub enum PathValueError {
    /// Input file missing or unreadable
    #[error("Input file not found or unreadable: {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not a readable CSV table
    #[error("Failed to read CSV {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    /// Required columns absent
    #[error(
        "Input CSV is missing required columns: {}. Required columns are: {}",
        .missing.join(", "),
        REQUIRED_COLUMNS.join(", ")
    )]
    Schema { missing: Vec<String> },

    /// Nothing left to value after filtering and coercion
    #[error("No usable rows found after filtering for required columns and nodes ({node_i}, {node_j})")]
    EmptyInput { node_i: String, node_j: String },

    #[error("Path endpoints must be distinct nodes, got {0} twice")]
    SameNode(String),

    /// Table operation failed during computation
    #[error("Computation failed: {0}")]
    Frame(#[from] PolarsError),

    /// Output table could not be written
    #[error("Failed to write hourly output CSV {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to render totals summary: {0}")]
    Summary(#[from] serde_json::Error),
}

/// Failure classes a calling script can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    InputRead,
    Schema,
    Computation,
    OutputWrite,
}

impl FailureClass {
    /// Process exit code; 2 stays reserved for command-line usage errors.
    pub fn exit_code(self) -> u8 {
        match self {
            FailureClass::InputRead => 3,
            FailureClass::Schema => 4,
            FailureClass::Computation => 5,
            FailureClass::OutputWrite => 6,
        }
    }
}

impl PathValueError {
    pub fn failure_class(&self) -> FailureClass {
        match self {
            PathValueError::Open { .. } | PathValueError::Parse { .. } => FailureClass::InputRead,
            PathValueError::Schema { .. } => FailureClass::Schema,
            PathValueError::EmptyInput { .. }
            | PathValueError::SameNode(_)
            | PathValueError::Frame(_) => FailureClass::Computation,
            PathValueError::Write { .. } | PathValueError::Summary(_) => FailureClass::OutputWrite,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.failure_class().exit_code()
    }
}

pub type Result<T> = std::result::Result<T, PathValueError>;
