use crate::data_loader::{DataLoader, RawTable};
use crate::error::{PathValueError, Result};
use crate::models::{HourlyPathValue, HourlyTable, Hour, LoadStats, NodePair, RawRecord, ScenarioKey};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Running mean; duplicate keys resolve to the average of their values.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Distribution factors of both endpoints for one scenario bucket.
/// `None` means the node has no row in that bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct FactorPivot {
    node_i: Option<f64>,
    node_j: Option<f64>,
}

/// One row of the pivot joined with its representative scenario value.
#[derive(Debug, Clone, PartialEq)]
struct ScenarioGroup {
    key: ScenarioKey,
    factors: FactorPivot,
    value: f64,
}

impl ScenarioGroup {
    /// `v * (df_i - df_j)`, with an absent factor counted as zero exposure.
    fn forward_contribution(&self) -> f64 {
        let flow = self.factors.node_i.unwrap_or(0.0) - self.factors.node_j.unwrap_or(0.0);
        self.value * flow
    }
}

pub struct PathValueCalculator {
    nodes: NodePair,
}

impl PathValueCalculator {
    pub fn new(nodes: NodePair) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &NodePair {
        &self.nodes
    }

    /// Hourly values of the forward and reverse path from a validated raw table.
    pub fn calculate(&self, table: &RawTable) -> Result<(HourlyTable, LoadStats)> {
        let (records, stats) = DataLoader::usable_records(table, &self.nodes)?;
        info!(
            "Loaded {} usable rows for {} ({} rows of other nodes ignored)",
            stats.usable_rows,
            self.nodes.forward_label(),
            stats.other_node_rows
        );

        let hourly = self.calculate_from_records(&records)?;
        Ok((hourly, stats))
    }

    /// Same as [`calculate`](Self::calculate) over already coerced records.
    /// Records of nodes outside the pair are ignored.
    pub fn calculate_from_records(&self, records: &[RawRecord]) -> Result<HourlyTable> {
        let relevant: Vec<&RawRecord> = records
            .iter()
            .filter(|r| self.nodes.contains(&r.n))
            .collect();

        if relevant.is_empty() {
            return Err(self.empty_input());
        }

        let pivot = self.pivot_factors(&relevant);
        let values = representative_values(&relevant);
        let groups = merge_groups(pivot, &values);

        if groups.is_empty() {
            return Err(self.empty_input());
        }
        self.warn_unobserved_nodes(&groups);

        debug!(
            "{} of {} priced scenario groups carry factors for {}",
            groups.len(),
            values.len(),
            self.nodes.forward_label()
        );

        let forward = hourly_forward(&groups);
        let forward_label = self.nodes.forward_label();
        let reverse_label = self.nodes.reverse_label();

        let mut rows: Vec<HourlyPathValue> = forward
            .iter()
            .map(|&(h, v_hourly)| HourlyPathValue {
                h,
                path: forward_label.clone(),
                v_hourly,
            })
            .collect();
        rows.extend(reverse_series(&forward, &reverse_label));

        let table = HourlyTable::new(rows);
        info!("Computed {} hourly values over {} hours", table.len(), forward.len());
        Ok(table)
    }

    /// Mean df per (h, rho, gamma, node), one column per endpoint.
    fn pivot_factors(&self, records: &[&RawRecord]) -> BTreeMap<ScenarioKey, FactorPivot> {
        let mut sums: BTreeMap<ScenarioKey, [MeanAccumulator; 2]> = BTreeMap::new();

        for record in records {
            let slot = if record.n == self.nodes.node_i { 0 } else { 1 };
            sums.entry(scenario_key(record)).or_default()[slot].push(record.df);
        }

        sums.into_iter()
            .map(|(key, [df_i, df_j])| {
                let pivot = FactorPivot {
                    node_i: df_i.mean(),
                    node_j: df_j.mean(),
                };
                (key, pivot)
            })
            .collect()
    }

    fn warn_unobserved_nodes(&self, groups: &[ScenarioGroup]) {
        let seen_i = groups.iter().any(|g| g.factors.node_i.is_some());
        let seen_j = groups.iter().any(|g| g.factors.node_j.is_some());

        for (node, seen) in [(&self.nodes.node_i, seen_i), (&self.nodes.node_j, seen_j)] {
            if !seen {
                warn!("Node {} has no usable rows; its distribution factor is taken as 0", node);
            }
        }
    }

    fn empty_input(&self) -> PathValueError {
        PathValueError::EmptyInput {
            node_i: self.nodes.node_i.clone(),
            node_j: self.nodes.node_j.clone(),
        }
    }
}

/// Compute the hourly path values for `(node_i, node_j)` and its reverse.
pub fn compute_hourly_values(table: &RawTable, node_i: &str, node_j: &str) -> Result<HourlyTable> {
    let calculator = PathValueCalculator::new(NodePair::new(node_i, node_j)?);
    calculator.calculate(table).map(|(hourly, _)| hourly)
}

fn scenario_key(record: &RawRecord) -> ScenarioKey {
    (Hour(record.h), record.rho.clone(), record.gamma.clone())
}

/// Mean scenario value per (h, rho, gamma) across all rows of either node.
fn representative_values(records: &[&RawRecord]) -> BTreeMap<ScenarioKey, f64> {
    let mut sums: BTreeMap<ScenarioKey, MeanAccumulator> = BTreeMap::new();
    for record in records {
        sums.entry(scenario_key(record)).or_default().push(record.v);
    }

    sums.into_iter()
        .filter_map(|(key, acc)| acc.mean().map(|mean| (key, mean)))
        .collect()
}

/// Inner join on (h, rho, gamma); keys present on one side only are dropped.
fn merge_groups(
    pivot: BTreeMap<ScenarioKey, FactorPivot>,
    values: &BTreeMap<ScenarioKey, f64>,
) -> Vec<ScenarioGroup> {
    pivot
        .into_iter()
        .filter_map(|(key, factors)| {
            values.get(&key).map(|&value| ScenarioGroup { key, factors, value })
        })
        .collect()
}

/// Sum forward contributions per hour. Groups arrive in key order and each
/// hour is summed sequentially, so the result does not depend on scheduling.
fn hourly_forward(groups: &[ScenarioGroup]) -> Vec<(Hour, f64)> {
    let mut by_hour: BTreeMap<Hour, Vec<f64>> = BTreeMap::new();
    for group in groups {
        by_hour
            .entry(group.key.0)
            .or_default()
            .push(group.forward_contribution());
    }

    let hours: Vec<(Hour, Vec<f64>)> = by_hour.into_iter().collect();
    hours
        .into_par_iter()
        .map(|(h, contributions)| (h, contributions.iter().sum::<f64>()))
        .collect()
}

/// Reverse path as the exact negation of the forward series.
pub fn reverse_series(forward: &[(Hour, f64)], reverse_label: &str) -> Vec<HourlyPathValue> {
    forward
        .iter()
        .map(|&(h, v_hourly)| HourlyPathValue {
            h,
            path: reverse_label.to_string(),
            v_hourly: -v_hourly,
        })
        .collect()
}
