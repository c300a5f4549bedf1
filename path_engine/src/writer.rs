use crate::error::{PathValueError, Result};
use crate::models::{HourlyTable, PathTotals, TotalsFormat};
use csv::WriterBuilder;
use std::io;
use std::path::Path;

pub const HOURLY_HEADER: [&str; 3] = ["h", "path", "v_hourly"];

/// Serialize the hourly table as CSV. The header is written even when the
/// table has no rows.
pub fn write_hourly<W: io::Write>(writer: W, table: &HourlyTable) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HOURLY_HEADER)?;
    for row in table.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_hourly_csv(path: &Path, table: &HourlyTable) -> Result<()> {
    let to_write_error = |source: csv::Error| PathValueError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(|e| to_write_error(csv::Error::from(e)))?;
    write_hourly(io::BufWriter::new(file), table).map_err(to_write_error)
}

/// One line per path: `(A, B): vobl=<value>, vopt=<value>`.
pub fn format_totals_line(totals: &PathTotals) -> String {
    format!("{}: vobl={:.6}, vopt={:.6}", totals.path, totals.vobl, totals.vopt)
}

pub fn render_totals(totals: &[PathTotals], format: TotalsFormat) -> Result<String> {
    match format {
        TotalsFormat::Text => Ok(totals
            .iter()
            .map(format_totals_line)
            .collect::<Vec<_>>()
            .join("\n")),
        TotalsFormat::Json => Ok(serde_json::to_string_pretty(totals)?),
    }
}
