use crate::data::Dataset;
use crate::error::ChartError;
use crate::request::{Aggregation, ChartKind, ChartRequest, ChartRequestPayload};
use tracing::debug;

/// Check a raw payload against the dataset schema and the chart/aggregation
/// compatibility rules. Pure: depends only on the header set and the payload.
pub fn validate_request(
    data: &Dataset,
    payload: &ChartRequestPayload,
) -> Result<ChartRequest, ChartError> {
    // 1. Category column: required, must exist
    let category_column = non_blank(payload.category_column.as_deref()).ok_or_else(|| {
        ChartError::Requirement {
            field: "category_column",
            reason: "(categories / x-axis)".to_string(),
        }
    })?;
    if !data.has_column(category_column) {
        return Err(ChartError::MissingColumn {
            field: "category_column",
            column: category_column.to_string(),
        });
    }

    // 2. Value column: optional, must exist when given
    let value_column = non_blank(payload.value_column.as_deref());
    if let Some(col) = value_column {
        if !data.has_column(col) {
            return Err(ChartError::MissingColumn {
                field: "value_column",
                column: col.to_string(),
            });
        }
    }

    // 3. Chart kind, before the aggregation so unknown kinds win
    let chart_kind = payload.chart_kind().parse::<ChartKind>()?;
    let aggregation = Aggregation::parse_optional(payload.aggregation.as_deref())?;

    // 4. Per-kind requirements
    check_compatibility(chart_kind, aggregation, value_column.is_some())?;

    debug!(
        %chart_kind,
        category = category_column,
        value = ?value_column,
        aggregation = ?aggregation,
        "validated chart request"
    );

    Ok(ChartRequest {
        category_column: category_column.to_string(),
        value_column: value_column.map(str::to_string),
        chart_kind,
        aggregation,
    })
}

/// Compatibility matrix between chart kind, aggregation and the presence of a
/// value column.
pub fn check_compatibility(
    kind: ChartKind,
    aggregation: Option<Aggregation>,
    has_value_column: bool,
) -> Result<(), ChartError> {
    match (kind, aggregation, has_value_column) {
        (ChartKind::Bar | ChartKind::Line, Some(Aggregation::Count), _) => Ok(()),
        (ChartKind::Bar | ChartKind::Line, _, false) => Err(ChartError::Requirement {
            field: "value_column",
            reason: format!("for {} charts unless aggregation is 'count'", kind),
        }),
        (ChartKind::Pie, Some(Aggregation::Sum), false) => Err(ChartError::Requirement {
            field: "value_column",
            reason: "for 'sum' aggregation in a pie chart".to_string(),
        }),
        (ChartKind::Pie, None, true) => Err(ChartError::Ambiguous),
        _ => Ok(()),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn make_data() -> Dataset {
        Dataset::new(
            vec!["region".to_string(), "sales".to_string()],
            vec![vec!["north".to_string(), "10".to_string()]],
        )
        .unwrap()
    }

    fn kind_of(payload: ChartRequestPayload) -> ErrorKind {
        validate_request(&make_data(), &payload).unwrap_err().kind()
    }

    #[test]
    fn test_validate_simple_bar() {
        let req = validate_request(&make_data(), &ChartRequestPayload::new("region").value("sales")).unwrap();
        assert_eq!(req.chart_kind, ChartKind::Bar);
        assert_eq!(req.category_column, "region");
        assert_eq!(req.value_column.as_deref(), Some("sales"));
        assert_eq!(req.aggregation, None);
    }

    #[test]
    fn test_validate_trims_column_names() {
        let req = validate_request(&make_data(), &ChartRequestPayload::new(" region ").value("sales ")).unwrap();
        assert_eq!(req.category_column, "region");
        assert_eq!(req.value_column.as_deref(), Some("sales"));
    }

    #[test]
    fn test_missing_category() {
        let payload = ChartRequestPayload::default();
        assert_eq!(kind_of(payload), ErrorKind::RequirementError);
        assert_eq!(kind_of(ChartRequestPayload::new("  ")), ErrorKind::RequirementError);
    }

    #[test]
    fn test_unknown_columns() {
        let err = validate_request(&make_data(), &ChartRequestPayload::new("city").value("sales")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaError);
        assert_eq!(err.field(), Some("category_column"));

        let err = validate_request(&make_data(), &ChartRequestPayload::new("region").value("profit")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaError);
        assert_eq!(err.field(), Some("value_column"));
    }

    #[test]
    fn test_bar_line_require_value_unless_count() {
        assert_eq!(kind_of(ChartRequestPayload::new("region")), ErrorKind::RequirementError);
        assert_eq!(kind_of(ChartRequestPayload::new("region").kind("line").aggregation("sum")), ErrorKind::RequirementError);
        assert!(validate_request(&make_data(), &ChartRequestPayload::new("region").aggregation("count")).is_ok());
    }

    #[test]
    fn test_pie_sum_requires_value() {
        let payload = ChartRequestPayload::new("region").kind("pie").aggregation("sum");
        assert_eq!(kind_of(payload), ErrorKind::RequirementError);
    }

    #[test]
    fn test_pie_value_without_aggregation_is_ambiguous() {
        assert_eq!(kind_of(ChartRequestPayload::new("region").value("sales").kind("pie")), ErrorKind::AmbiguityError);
        assert_eq!(
            kind_of(ChartRequestPayload::new("region").value("sales").kind("pie").aggregation("none")),
            ErrorKind::AmbiguityError
        );
    }

    #[test]
    fn test_pie_without_value_or_aggregation_is_allowed() {
        let req = validate_request(&make_data(), &ChartRequestPayload::new("region").kind("pie")).unwrap();
        assert_eq!(req.chart_kind, ChartKind::Pie);
        assert!(req.value_column.is_none());
    }

    #[test]
    fn test_unsupported_kind() {
        let payload = ChartRequestPayload::new("region").value("sales").kind("scatter");
        assert_eq!(kind_of(payload), ErrorKind::UnsupportedKindError);
    }

    #[test]
    fn test_schema_checked_before_kind() {
        let payload = ChartRequestPayload::new("city").kind("scatter");
        assert_eq!(kind_of(payload), ErrorKind::SchemaError);
    }

    #[test]
    fn test_unsupported_kind_reported_before_aggregation() {
        let payload = ChartRequestPayload::new("region").value("sales").kind("scatter").aggregation("mean");
        assert_eq!(kind_of(payload), ErrorKind::UnsupportedKindError);
    }

    #[test]
    fn test_null_chart_kind_defaults_to_bar() {
        let payload: ChartRequestPayload =
            serde_json::from_str(r#"{"category_column": "region", "value_column": "sales", "chart_kind": null}"#)
                .unwrap();
        let req = validate_request(&make_data(), &payload).unwrap();
        assert_eq!(req.chart_kind, ChartKind::Bar);
    }

    #[test]
    fn test_unsupported_aggregation() {
        let payload = ChartRequestPayload::new("region").value("sales").aggregation("mean");
        assert_eq!(kind_of(payload), ErrorKind::UnsupportedAggregationError);
    }

    #[test]
    fn test_compatibility_matrix() {
        use Aggregation::{Count, Sum};
        let aggregations = [None, Some(Sum), Some(Count)];

        for kind in ChartKind::ALL {
            for aggregation in aggregations {
                for has_value in [false, true] {
                    let result = check_compatibility(kind, aggregation, has_value).map_err(|e| e.kind());
                    let expected = match (kind, aggregation, has_value) {
                        (ChartKind::Pie, Some(Sum), false) => Err(ErrorKind::RequirementError),
                        (ChartKind::Pie, None, true) => Err(ErrorKind::AmbiguityError),
                        (ChartKind::Pie, _, _) => Ok(()),
                        (_, Some(Count), _) => Ok(()),
                        (_, _, false) => Err(ErrorKind::RequirementError),
                        (_, _, true) => Ok(()),
                    };
                    assert_eq!(result, expected, "{:?} {:?} value={}", kind, aggregation, has_value);
                }
            }
        }
    }
}
