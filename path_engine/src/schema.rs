use crate::data_loader::RawTable;
use crate::error::{PathValueError, Result};
use crate::models::REQUIRED_COLUMNS;

/// Fail with every missing required column, not just the first.
pub fn validate_columns(table: &RawTable) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !table.has_column(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PathValueError::Schema { missing })
    }
}
