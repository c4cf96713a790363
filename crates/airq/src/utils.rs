//! Shared helpers for pulling typed values out of polars columns.

use crate::error::{AnalysisError, Result};
use polars::prelude::*;

/// Tokens read as missing values in addition to empty fields.
pub const MISSING_MARKERS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Parse one text cell as a float. Surrounding whitespace is ignored;
/// anything else that is not a plain number is rejected.
pub fn parse_float_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check whether every non-missing value of a text series parses as a float.
///
/// Returns false for a series with no values at all.
pub fn is_float_like(series: &Series) -> bool {
    let Ok(strings) = series.str() else {
        return false;
    };
    let mut seen = 0usize;
    for value in strings.into_iter().flatten() {
        if parse_float_cell(value).is_none() {
            return false;
        }
        seen += 1;
    }
    seen > 0
}

/// A numeric column cast to Float64, NaN cells turned into nulls.
pub fn float_series(df: &DataFrame, name: &str) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))?;
    let series = column.as_materialized_series();

    if !is_numeric_dtype(series.dtype()) {
        return Err(AnalysisError::SchemaMismatch {
            column: name.to_string(),
            reason: format!("expected a numeric column, found {}", series.dtype()),
        });
    }

    let floats = series.cast(&DataType::Float64)?;
    let cleaned: Float64Chunked = floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(cleaned.with_name(series.name().clone()).into_series())
}

/// Values of a numeric column as `f64`, missing cells as `None`.
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(float_series(df, name)?.f64()?.into_iter().collect())
}

/// Missing cells of a column. NaN counts as missing in float columns.
pub fn missing_count(column: &Column) -> usize {
    let series = column.as_materialized_series();
    let nan_count = match series.dtype() {
        DataType::Float64 => series
            .f64()
            .map(|ca| ca.into_iter().filter(|v| v.is_some_and(f64::is_nan)).count())
            .unwrap_or(0),
        DataType::Float32 => series
            .f32()
            .map(|ca| ca.into_iter().filter(|v| v.is_some_and(f32::is_nan)).count())
            .unwrap_or(0),
        _ => 0,
    };
    series.null_count() + nan_count
}

/// Values of any column rendered as text, missing cells as `None`.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))?;
    let strings = column.as_materialized_series().cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_parse_float_cell() {
        assert_eq!(parse_float_cell("42"), Some(42.0));
        assert_eq!(parse_float_cell(" 4.8 "), Some(4.8));
        assert_eq!(parse_float_cell("-1e2"), Some(-100.0));
        assert_eq!(parse_float_cell(""), None);
        assert_eq!(parse_float_cell("12 µg"), None);
        assert_eq!(parse_float_cell("inf"), None);
    }

    #[test]
    fn test_is_float_like() {
        let numeric = Series::new("a".into(), &[Some("1"), None, Some("2.5")]);
        let mixed = Series::new("b".into(), &[Some("1"), Some("x")]);
        let empty = Series::new("c".into(), &[None::<&str>, None]);
        assert!(is_float_like(&numeric));
        assert!(!is_float_like(&mixed));
        assert!(!is_float_like(&empty));
    }

    #[test]
    fn test_float_values_rejects_text_column() {
        let df = df!["City" => ["Patna", "Pune"]].unwrap();
        let err = float_values(&df, "City").unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    }

    #[test]
    fn test_float_values_missing_column() {
        let df = df!["SPM" => [1.0]].unwrap();
        let err = float_values(&df, "RSPM").unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnNotFound(ref c) if c == "RSPM"));
    }

    #[test]
    fn test_float_values_casts_integers() {
        let df = df!["n" => [Some(1i64), None, Some(3)]].unwrap();
        assert_eq!(float_values(&df, "n").unwrap(), vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_float_values_treats_nan_as_missing() {
        let df = df!["RSPM" => [Some(1.0), Some(f64::NAN), None]].unwrap();
        assert_eq!(float_values(&df, "RSPM").unwrap(), vec![Some(1.0), None, None]);

        let series = float_series(&df, "RSPM").unwrap();
        assert_eq!(series.name().as_str(), "RSPM");
        assert_eq!(series.null_count(), 2);
        assert_eq!(series.mean(), Some(1.0));
    }

    #[test]
    fn test_missing_count() {
        let df = df![
            "RSPM" => [Some(1.0), Some(f64::NAN), None],
            "City" => [Some("NaN"), None, Some("Pune")],
        ]
        .unwrap();
        assert_eq!(missing_count(df.column("RSPM").unwrap()), 2);
        assert_eq!(missing_count(df.column("City").unwrap()), 1);
    }
}
