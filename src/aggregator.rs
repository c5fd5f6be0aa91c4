// Aggregation: group rows by category and reduce the value column

use crate::coerce::coerce_column;
use crate::data::Dataset;
use crate::error::ChartError;
use crate::request::{Aggregation, ChartKind, ChartRequest};
use std::collections::HashMap;
use tracing::{debug, warn};

/// The pure reduction a validated request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reduction {
    /// One entry per source row; unparseable cells become gaps.
    Passthrough,
    /// Per-category sum; unparseable cells drop their row.
    Sum,
    /// Per-category row count.
    Count,
}

impl Reduction {
    /// Dispatch table keyed by (chart kind, aggregation).
    ///
    /// Pie charts always aggregate: without a declared aggregation they fall
    /// back to counting (validation has already rejected the case where a
    /// value column was supplied).
    pub fn for_request(kind: ChartKind, aggregation: Option<Aggregation>) -> Self {
        match (kind, aggregation) {
            (_, Some(Aggregation::Sum)) => Reduction::Sum,
            (_, Some(Aggregation::Count)) => Reduction::Count,
            (ChartKind::Bar | ChartKind::Line, None) => Reduction::Passthrough,
            (ChartKind::Pie, None) => Reduction::Count,
        }
    }

    pub fn apply(&self, request: &ChartRequest, data: &Dataset) -> Result<Vec<GroupedRow>, ChartError> {
        match self {
            Reduction::Passthrough => compute_passthrough(request, data),
            Reduction::Sum => compute_sum(request, data),
            Reduction::Count => compute_count(request, data),
        }
    }
}

/// One output entry: a category and its (possibly missing) value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedRow {
    pub category: String,
    pub value: Option<f64>,
}

/// Run the reduction selected for `request` over `data`.
pub fn aggregate_rows(request: &ChartRequest, data: &Dataset) -> Result<(Reduction, Vec<GroupedRow>), ChartError> {
    let reduction = Reduction::for_request(request.chart_kind, request.aggregation);
    debug!(?reduction, rows = data.len(), "aggregating");
    let rows = reduction.apply(request, data)?;
    Ok((reduction, rows))
}

fn category_cells<'a>(request: &ChartRequest, data: &'a Dataset) -> Result<Vec<&'a str>, ChartError> {
    data.column(&request.category_column)
        .map(|cells| cells.collect())
        .ok_or_else(|| ChartError::MissingColumn {
            field: "category_column",
            column: request.category_column.clone(),
        })
}

fn value_column(request: &ChartRequest) -> Result<&str, ChartError> {
    request.value_column.as_deref().ok_or_else(|| ChartError::Requirement {
        field: "value_column",
        reason: format!("for {} charts unless aggregation is 'count'", request.chart_kind),
    })
}

/// Accumulate `(category, amount)` pairs into groups ordered by first
/// appearance of each category.
fn group_in_order<'a, I>(pairs: I) -> Vec<(&'a str, f64)>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, f64)> = Vec::new();

    for (category, amount) in pairs {
        match index.get(category) {
            Some(&i) => groups[i].1 += amount,
            None => {
                index.insert(category, groups.len());
                groups.push((category, amount));
            }
        }
    }

    groups
}

fn compute_count(request: &ChartRequest, data: &Dataset) -> Result<Vec<GroupedRow>, ChartError> {
    let categories = category_cells(request, data)?;
    let groups = group_in_order(categories.into_iter().map(|c| (c, 1.0)));

    Ok(groups
        .into_iter()
        .map(|(category, count)| GroupedRow {
            category: category.to_string(),
            value: Some(count),
        })
        .collect())
}

fn compute_sum(request: &ChartRequest, data: &Dataset) -> Result<Vec<GroupedRow>, ChartError> {
    let column = value_column(request)?;
    let categories = category_cells(request, data)?;
    let values = coerce_column(data, column)?;

    // Rows without a number take no part in the sum or in group membership
    let valid: Vec<(&str, f64)> = categories
        .into_iter()
        .zip(values)
        .filter_map(|(c, v)| v.map(|v| (c, v)))
        .collect();

    if valid.is_empty() {
        return Err(ChartError::NoNumericData {
            column: column.to_string(),
            context: "sum aggregation",
        });
    }

    let dropped = data.len() - valid.len();
    if dropped > 0 {
        warn!(column, dropped, "dropped rows with non-numeric values from sum");
    }

    group_in_order(valid)
        .into_iter()
        .map(|(category, total)| {
            if !total.is_finite() {
                return Err(ChartError::Coercion {
                    column: column.to_string(),
                    message: format!("sum for category '{}' is out of range", category),
                });
            }
            Ok(GroupedRow {
                category: category.to_string(),
                value: Some(total),
            })
        })
        .collect()
}

fn compute_passthrough(request: &ChartRequest, data: &Dataset) -> Result<Vec<GroupedRow>, ChartError> {
    let column = value_column(request)?;
    let categories = category_cells(request, data)?;
    let values = coerce_column(data, column)?;

    let missing = values.iter().filter(|v| v.is_none()).count();
    if !values.is_empty() && missing == values.len() {
        return Err(ChartError::NoNumericData {
            column: column.to_string(),
            context: "plotting (all values are non-numeric or empty)",
        });
    }
    if missing > 0 {
        warn!(column, missing, "non-numeric values left as gaps");
    }

    Ok(categories
        .into_iter()
        .zip(values)
        .map(|(category, value)| GroupedRow {
            category: category.to_string(),
            value,
        })
        .collect())
}
