use crate::models::{HourlyTable, PathTotals};
use std::collections::BTreeMap;

/// Per-path obligation (`vobl`) and option (`vopt`) valuations, ordered by
/// path label. Paths never interact.
pub fn compute_totals(hourly: &HourlyTable) -> Vec<PathTotals> {
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for row in hourly.rows() {
        let (vobl, vopt) = totals.entry(row.path.as_str()).or_insert((0.0, 0.0));
        *vobl += row.v_hourly;
        *vopt += row.v_hourly.max(0.0);
    }

    totals
        .into_iter()
        .map(|(path, (vobl, vopt))| PathTotals {
            path: path.to_string(),
            vobl,
            vopt,
        })
        .collect()
}
