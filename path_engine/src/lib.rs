pub mod calculator;
pub mod data_loader;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod totals;
pub mod writer;

pub use calculator::{compute_hourly_values, PathValueCalculator};
pub use data_loader::{DataLoader, RawTable};
pub use error::{FailureClass, PathValueError};
pub use models::{HourlyPathValue, HourlyTable, LoadStats, NodePair, PathTotals, RawRecord, TotalsFormat};
pub use pipeline::{run, PipelineConfig, PipelineReport};
pub use schema::validate_columns;
pub use totals::compute_totals;
