// Chart request types: the raw caller payload and its validated form

use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw request as sent by a caller, before any validation.
///
/// Field names follow the engine's vocabulary; the older
/// `x_column`/`y_column`/`chart_type`/`aggregation_type` names are accepted
/// as aliases. A missing or `null` chart kind means bar.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ChartRequestPayload {
    #[serde(default, alias = "x_column")]
    pub category_column: Option<String>,
    #[serde(default, alias = "y_column")]
    pub value_column: Option<String>,
    #[serde(default, alias = "chart_type")]
    pub chart_kind: Option<String>,
    #[serde(default, alias = "aggregation_type")]
    pub aggregation: Option<String>,
}

pub const DEFAULT_CHART_KIND: &str = "bar";

impl ChartRequestPayload {
    pub fn new(category_column: impl Into<String>) -> Self {
        Self {
            category_column: Some(category_column.into()),
            ..Default::default()
        }
    }

    pub fn value(mut self, column: impl Into<String>) -> Self {
        self.value_column = Some(column.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.chart_kind = Some(kind.into());
        self
    }

    /// Requested chart kind, falling back to bar when unset.
    pub fn chart_kind(&self) -> &str {
        self.chart_kind.as_deref().unwrap_or(DEFAULT_CHART_KIND)
    }

    pub fn aggregation(mut self, aggregation: impl Into<String>) -> Self {
        self.aggregation = Some(aggregation.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Pie];
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            _ => Err(ChartError::UnsupportedKind(s.to_string())),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Pie => write!(f, "pie"),
        }
    }
}

/// Declared reduction. An unset aggregation is `None` at the call sites,
/// never a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Sum,
    Count,
}

impl Aggregation {
    /// Parse an optional aggregation string. `"none"` and blank mean unset.
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, ChartError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(None),
            "sum" => Ok(Some(Aggregation::Sum)),
            "count" => Ok(Some(Aggregation::Count)),
            _ => Err(ChartError::UnsupportedAggregation(raw.to_string())),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Sum => write!(f, "sum"),
            Aggregation::Count => write!(f, "count"),
        }
    }
}

/// A request whose columns exist in the dataset and whose
/// chart/aggregation combination is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub category_column: String,
    pub value_column: Option<String>,
    pub chart_kind: ChartKind,
    pub aggregation: Option<Aggregation>,
}
