//! Engine error taxonomy.
//!
//! Every failure carries a stable [`ErrorKind`] for transports to map onto
//! their own status codes, plus a human-readable message via `Display`.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// A referenced column is not part of the dataset.
    #[error("Selected {field} '{column}' not found in the uploaded data")]
    MissingColumn { field: &'static str, column: String },

    /// A column needed by the chart/aggregation combination was not supplied.
    #[error("{field} is required {reason}")]
    Requirement { field: &'static str, reason: String },

    #[error("Pie charts with a value column must declare 'sum' or 'count' aggregation")]
    Ambiguous,

    #[error("Unsupported chart_kind: '{0}'")]
    UnsupportedKind(String),

    #[error("Unsupported aggregation: '{0}' (expected none, sum or count)")]
    UnsupportedAggregation(String),

    #[error("No valid numeric data found in column '{column}' for {context}")]
    NoNumericData { column: String, context: &'static str },

    #[error("Could not coerce column '{column}': {message}")]
    Coercion { column: String, message: String },
}

/// Discriminant of [`ChartError`], serialized under the names transports see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    SchemaError,
    RequirementError,
    AmbiguityError,
    UnsupportedKindError,
    UnsupportedAggregationError,
    NoNumericDataError,
    CoercionError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SchemaError => "SchemaError",
            ErrorKind::RequirementError => "RequirementError",
            ErrorKind::AmbiguityError => "AmbiguityError",
            ErrorKind::UnsupportedKindError => "UnsupportedKindError",
            ErrorKind::UnsupportedAggregationError => "UnsupportedAggregationError",
            ErrorKind::NoNumericDataError => "NoNumericDataError",
            ErrorKind::CoercionError => "CoercionError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ChartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChartError::MissingColumn { .. } => ErrorKind::SchemaError,
            ChartError::Requirement { .. } => ErrorKind::RequirementError,
            ChartError::Ambiguous => ErrorKind::AmbiguityError,
            ChartError::UnsupportedKind(_) => ErrorKind::UnsupportedKindError,
            ChartError::UnsupportedAggregation(_) => ErrorKind::UnsupportedAggregationError,
            ChartError::NoNumericData { .. } => ErrorKind::NoNumericDataError,
            ChartError::Coercion { .. } => ErrorKind::CoercionError,
        }
    }

    /// Payload field the error points at, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ChartError::MissingColumn { field, .. } | ChartError::Requirement { field, .. } => {
                Some(*field)
            }
            ChartError::Ambiguous => Some("aggregation"),
            ChartError::UnsupportedKind(_) => Some("chart_kind"),
            ChartError::UnsupportedAggregation(_) => Some("aggregation"),
            ChartError::NoNumericData { .. } | ChartError::Coercion { .. } => Some("value_column"),
        }
    }
}

/// Wire shape of a failure: `{"error": ..., "kind": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl From<&ChartError> for ErrorBody {
    fn from(err: &ChartError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
            field: err.field(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = ChartError::MissingColumn {
            field: "category_column",
            column: "region".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::SchemaError);
        assert_eq!(err.kind().to_string(), "SchemaError");
        assert_eq!(ChartError::Ambiguous.kind().as_str(), "AmbiguityError");
    }

    #[test]
    fn test_error_body_serialization() {
        let err = ChartError::UnsupportedKind("scatter".to_string());
        let body = ErrorBody::from(&err);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["kind"], "UnsupportedKindError");
        assert_eq!(json["field"], "chart_kind");
        assert!(json["error"].as_str().unwrap().contains("scatter"));
    }
}
