use crate::error::PathValueError;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

pub const COL_HOUR: &str = "h";
pub const COL_NODE: &str = "n";
pub const COL_RHO: &str = "rho";
pub const COL_GAMMA: &str = "gamma";
pub const COL_VALUE: &str = "v";
pub const COL_DF: &str = "df";

/// Input fields every raw table must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 6] = [COL_HOUR, COL_NODE, COL_RHO, COL_GAMMA, COL_VALUE, COL_DF];

pub const DEFAULT_NODE_I: &str = "LGD_LANGFORD";
pub const DEFAULT_NODE_J: &str = "TRSES_UNIT6";

/// Ordered pair of nodes; `node_i -> node_j` is the forward path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodePair {
    pub node_i: String,
    pub node_j: String,
}

impl NodePair {
    pub fn new(node_i: impl Into<String>, node_j: impl Into<String>) -> Result<Self, PathValueError> {
        let node_i = node_i.into();
        let node_j = node_j.into();
        if node_i == node_j {
            return Err(PathValueError::SameNode(node_i));
        }
        Ok(Self { node_i, node_j })
    }

    pub fn forward_label(&self) -> String {
        path_label(&self.node_i, &self.node_j)
    }

    pub fn reverse_label(&self) -> String {
        path_label(&self.node_j, &self.node_i)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.node_i == node || self.node_j == node
    }
}

impl Default for NodePair {
    fn default() -> Self {
        Self {
            node_i: DEFAULT_NODE_I.to_string(),
            node_j: DEFAULT_NODE_J.to_string(),
        }
    }
}

/// Renders a directional path as `(A, B)`.
pub fn path_label(from: &str, to: &str) -> String {
    format!("({}, {})", from, to)
}

/// Hour identifier. Totally ordered so it can key ordered maps; integral
/// hours render without a fractional part.
#[derive(Debug, Clone, Copy)]
pub struct Hour(pub f64);

impl PartialEq for Hour {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Hour {}

impl PartialOrd for Hour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hour {
    fn cmp(&self, other: &Self) -> Ordering {
        // 0.0 and -0.0 are the same hour
        (self.0 + 0.0).total_cmp(&(other.0 + 0.0))
    }
}

impl Hour {
    fn as_integral(&self) -> Option<i64> {
        let in_range = self.0.abs() < 9.0e15;
        (self.0.is_finite() && in_range && self.0.fract() == 0.0).then(|| self.0 as i64)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integral() {
            Some(hour) => write!(f, "{}", hour),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for Hour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integral() {
            Some(hour) => serializer.serialize_i64(hour),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// One usable input row after numeric coercion and missing-data filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub h: f64,
    pub n: String,
    pub rho: String,
    pub gamma: String,
    pub v: f64,
    pub df: f64,
}

impl RawRecord {
    pub fn new(h: f64, n: &str, rho: &str, gamma: &str, v: f64, df: f64) -> Self {
        Self {
            h,
            n: n.to_string(),
            rho: rho.to_string(),
            gamma: gamma.to_string(),
            v,
            df,
        }
    }
}

/// Scenario bucket within an hour.
pub type ScenarioKey = (Hour, String, String);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPathValue {
    pub h: Hour,
    pub path: String,
    pub v_hourly: f64,
}

/// Hourly values for both directions of a path, sorted by `(h, path)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlyTable {
    rows: Vec<HourlyPathValue>,
}

impl HourlyTable {
    /// Sorts on construction so every table honours the output ordering.
    pub fn new(mut rows: Vec<HourlyPathValue>) -> Self {
        rows.sort_by(|a, b| a.h.cmp(&b.h).then_with(|| a.path.cmp(&b.path)));
        Self { rows }
    }

    pub fn rows(&self) -> &[HourlyPathValue] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values for one path label, in hour order.
    pub fn series(&self, path: &str) -> Vec<(Hour, f64)> {
        self.rows
            .iter()
            .filter(|row| row.path == path)
            .map(|row| (row.h, row.v_hourly))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTotals {
    pub path: String,
    pub vobl: f64, // obligation: algebraic sum
    pub vopt: f64, // option: sum floored at zero per hour
}

/// Row accounting for the missing-data policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub total_rows: usize,
    pub other_node_rows: usize,
    pub incomplete_rows: usize,
    pub usable_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalsFormat {
    #[default]
    Text,
    Json,
}
