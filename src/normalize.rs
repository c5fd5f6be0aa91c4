use crate::aggregator::{GroupedRow, Reduction};
use crate::request::ChartRequest;
use serde::{Deserialize, Serialize};

/// Name reported as the value column when rows were counted.
pub const COUNT_COLUMN: &str = "count";

/// Chart-ready output: aligned labels and values.
///
/// `labels[i]` and `values[i]` always describe the same category; a `None`
/// value serializes as `null` and is rendered as a gap. Counts are carried
/// as `f64` like every other value, so a count of two serializes as `2.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub resolved_category_column: String,
    pub resolved_value_column: String,
}

impl ChartResult {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub fn normalize(request: &ChartRequest, reduction: Reduction, rows: Vec<GroupedRow>) -> ChartResult {
    let resolved_value_column = match reduction {
        Reduction::Count => COUNT_COLUMN.to_string(),
        Reduction::Sum | Reduction::Passthrough => request.value_column.clone().unwrap_or_default(),
    };

    let (labels, values) = rows
        .into_iter()
        .map(|row| (row.category, row.value))
        .unzip();

    ChartResult {
        labels,
        values,
        resolved_category_column: request.category_column.clone(),
        resolved_value_column,
    }
}
