// Numeric coercion of raw string cells

use crate::data::Dataset;
use crate::error::ChartError;
use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

/// Recognize a plain decimal literal: optional sign, digits, optional
/// fractional part. `12`, `-3.5`, `+.5` and `7.` are accepted; exponents,
/// `inf`, `nan` and grouping separators are not.
fn decimal_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    )))(input)
}

/// Parse one cell. Surrounding whitespace is ignored; anything that is not a
/// complete decimal literal yields `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let (_, literal) = all_consuming(decimal_literal)(raw.trim()).ok()?;
    literal.parse::<f64>().ok()
}

/// Coerce every cell of `column`, row-aligned. Unparseable cells become
/// `None`; a literal too large for `f64` is a hard error.
pub fn coerce_column(data: &Dataset, column: &str) -> Result<Vec<Option<f64>>, ChartError> {
    let cells = data.column(column).ok_or_else(|| ChartError::MissingColumn {
        field: "value_column",
        column: column.to_string(),
    })?;

    cells
        .map(|cell| match parse_number(cell) {
            Some(v) if !v.is_finite() => Err(ChartError::Coercion {
                column: column.to_string(),
                message: format!("value '{}' is out of range", cell.trim()),
            }),
            parsed => Ok(parsed),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers_and_decimals() {
        assert_eq!(parse_number("12"), Some(12.0));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
        assert_eq!(parse_number("+.5"), Some(0.5));
        assert_eq!(parse_number("7."), Some(7.0));
        assert_eq!(parse_number("0007"), Some(7.0));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_number("  42 "), Some(42.0));
        assert_eq!(parse_number("\t-1\n"), Some(-1.0));
    }

    #[test]
    fn test_parse_rejects_non_decimal() {
        for raw in ["", "   ", "abc", "1e5", "inf", "NaN", "1,000", "1.2.3", ".", "-", "+-1", "12abc", "1 2"] {
            assert_eq!(parse_number(raw), None, "expected '{}' to be unparseable", raw);
        }
    }

    #[test]
    fn test_coerce_column_keeps_row_alignment() {
        let data = Dataset::new(
            vec!["v".to_string()],
            vec![vec!["3".to_string()], vec!["x".to_string()], vec!["5".to_string()]],
        )
        .unwrap();
        let coerced = coerce_column(&data, "v").unwrap();
        assert_eq!(coerced, vec![Some(3.0), None, Some(5.0)]);
    }

    #[test]
    fn test_coerce_column_out_of_range() {
        let huge = format!("1{}", "0".repeat(400));
        let data = Dataset::new(vec!["v".to_string()], vec![vec![huge]]).unwrap();
        let err = coerce_column(&data, "v").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::CoercionError);
    }
}
