use crate::error::{PathValueError, Result};
use crate::models::{
    LoadStats, NodePair, RawRecord, COL_DF, COL_GAMMA, COL_HOUR, COL_NODE, COL_RHO, COL_VALUE,
};
use log::{debug, warn};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Field contents read as missing, the markers pandas treats as NA by default.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Input table as read from disk. Columns stay textual so that numeric
/// coercion happens under the missing-data policy instead of at parse time.
#[derive(Debug, Clone)]
pub struct RawTable {
    frame: DataFrame,
}

impl RawTable {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }
}

pub struct DataLoader;

impl DataLoader {
    /// Read a CSV with a header row; every column is loaded as a string.
    pub fn read_table(path: &Path) -> Result<RawTable> {
        let file = File::open(path).map_err(|source| PathValueError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| {
                opts.with_null_values(Some(NullValues::AllColumns(
                    NA_TOKENS.iter().map(|token| (*token).into()).collect(),
                )))
            })
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|source| PathValueError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "Read {} rows x {} columns from {}",
            frame.height(),
            frame.width(),
            path.display()
        );

        Ok(RawTable::new(frame))
    }

    /// Restrict to the path's nodes, coerce numeric fields and drop rows
    /// with any missing value. Unparsable numbers count as missing.
    pub fn usable_records(table: &RawTable, nodes: &NodePair) -> Result<(Vec<RawRecord>, LoadStats)> {
        let total_rows = table.height();

        let relevant = table
            .frame()
            .clone()
            .lazy()
            .select([
                numeric(COL_HOUR),
                col(COL_NODE).cast(DataType::String),
                col(COL_RHO).cast(DataType::String),
                col(COL_GAMMA).cast(DataType::String),
                numeric(COL_VALUE),
                numeric(COL_DF),
            ])
            .filter(
                col(COL_NODE)
                    .eq(lit(nodes.node_i.as_str()))
                    .or(col(COL_NODE).eq(lit(nodes.node_j.as_str()))),
            )
            .collect()?;

        let hours = relevant.column(COL_HOUR)?.f64()?;
        let node_names = relevant.column(COL_NODE)?.str()?;
        let rhos = relevant.column(COL_RHO)?.str()?;
        let gammas = relevant.column(COL_GAMMA)?.str()?;
        let values = relevant.column(COL_VALUE)?.f64()?;
        let factors = relevant.column(COL_DF)?.f64()?;

        let mut records = Vec::with_capacity(relevant.height());

        for idx in 0..relevant.height() {
            if let (Some(h), Some(n), Some(rho), Some(gamma), Some(v), Some(df)) = (
                hours.get(idx),
                node_names.get(idx),
                rhos.get(idx),
                gammas.get(idx),
                values.get(idx),
                factors.get(idx),
            ) {
                // NaN is as missing as null
                if h.is_nan() || v.is_nan() || df.is_nan() {
                    continue;
                }
                records.push(RawRecord::new(h, n, rho, gamma, v, df));
            }
        }

        let stats = LoadStats {
            total_rows,
            other_node_rows: total_rows - relevant.height(),
            incomplete_rows: relevant.height() - records.len(),
            usable_rows: records.len(),
        };

        if stats.incomplete_rows > 0 {
            warn!(
                "Dropped {} of {} rows for {} with missing or non-numeric values",
                stats.incomplete_rows,
                relevant.height(),
                nodes.forward_label()
            );
        }

        Ok((records, stats))
    }
}

/// Non-strict numeric coercion; surrounding whitespace is not part of the number.
fn numeric(name: &str) -> Expr {
    col(name)
        .cast(DataType::String)
        .str()
        .strip_chars(lit(Null {}))
        .cast(DataType::Float64)
}
