//! Read-only diagnostics over a table.
//!
//! This module covers:
//! - Missing-value counts per column ([`null_rates`])
//! - Shape and column types ([`dataset_info`])
//! - Summary statistics ([`describe`])

mod statistics;

use crate::error::Result;
use crate::types::{ColumnDescription, ColumnInfo, DatasetInfo, NullRate};
use crate::utils::{float_series, is_numeric_dtype, missing_count, text_values};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

use statistics::{calculate_std, most_frequent, quantile};

/// Count and percentage of missing cells per column, in column order.
///
/// NaN in a float column counts as missing, the same as a null.
pub fn null_rates(df: &DataFrame) -> Vec<NullRate> {
    let rows = df.height();
    df.get_columns()
        .iter()
        .map(|col| {
            let missing = missing_count(col);
            let missing_percentage = if rows > 0 {
                (missing as f64 / rows as f64) * 100.0
            } else {
                0.0
            };
            NullRate {
                column: col.name().to_string(),
                missing_count: missing,
                missing_percentage,
            }
        })
        .collect()
}

/// Row count plus name, type and non-missing count of each column.
pub fn dataset_info(df: &DataFrame) -> DatasetInfo {
    let rows = df.height();
    let columns = df
        .get_columns()
        .iter()
        .map(|col| ColumnInfo {
            name: col.name().to_string(),
            dtype: format!("{:?}", col.dtype()),
            non_null: rows - missing_count(col),
        })
        .collect();

    DatasetInfo { rows, columns }
}

/// Summary statistics of every column.
///
/// Numeric columns get count, mean, sample standard deviation, min,
/// quartiles and max; all other columns get count, distinct count and the
/// most frequent value.
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnDescription>> {
    let mut descriptions = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();
        let description = if is_numeric_dtype(col.dtype()) {
            describe_numeric(df, &name)?
        } else {
            describe_text(df, &name)?
        };
        descriptions.push(description);
    }

    debug!("Described {} columns", descriptions.len());
    Ok(descriptions)
}

fn describe_numeric(df: &DataFrame, name: &str) -> Result<ColumnDescription> {
    let series = float_series(df, name)?;
    let mean = series.mean();

    let mut present: Vec<f64> = series.f64()?.into_iter().flatten().collect();
    present.sort_by(f64::total_cmp);

    Ok(ColumnDescription::Numeric {
        column: name.to_string(),
        count: present.len(),
        mean,
        std: calculate_std(&present),
        min: present.first().copied(),
        q25: quantile(&present, 0.25),
        median: quantile(&present, 0.5),
        q75: quantile(&present, 0.75),
        max: present.last().copied(),
    })
}

fn describe_text(df: &DataFrame, name: &str) -> Result<ColumnDescription> {
    let values = text_values(df, name)?;
    let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
    let unique = present.iter().collect::<HashSet<_>>().len();
    let (top, freq) = match most_frequent(present.iter().copied()) {
        Some((value, count)) => (Some(value), count),
        None => (None, 0),
    };

    Ok(ColumnDescription::Text {
        column: name.to_string(),
        count: present.len(),
        unique,
        top,
        freq,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df![
            "City" => [Some("Patna"), Some("Pune"), None, Some("Patna")],
            "RSPM" => [Some(10.0), None, Some(30.0), Some(20.0)],
            "SPM" => [None::<f64>, None, None, None],
        ]
        .unwrap()
    }

    #[test]
    fn test_null_rates() {
        let rates = null_rates(&sample());
        assert_eq!(
            rates,
            vec![
                NullRate { column: "City".into(), missing_count: 1, missing_percentage: 25.0 },
                NullRate { column: "RSPM".into(), missing_count: 1, missing_percentage: 25.0 },
                NullRate { column: "SPM".into(), missing_count: 4, missing_percentage: 100.0 },
            ]
        );
    }

    #[test]
    fn test_null_rates_empty_table() {
        let df = df!["RSPM" => Vec::<f64>::new()].unwrap();
        let rates = null_rates(&df);
        assert_eq!(rates[0].missing_count, 0);
        assert_eq!(rates[0].missing_percentage, 0.0);
    }

    #[test]
    fn test_null_rates_count_nan_as_missing() {
        let df = df!["RSPM" => [Some(10.0), Some(f64::NAN), None, Some(20.0)]].unwrap();

        let rates = null_rates(&df);
        assert_eq!(rates[0].missing_count, 2);
        assert_eq!(rates[0].missing_percentage, 50.0);
        assert_eq!(dataset_info(&df).columns[0].non_null, 2);
    }

    #[test]
    fn test_dataset_info() {
        let info = dataset_info(&sample());
        assert_eq!(info.rows, 4);
        assert_eq!(info.columns.len(), 3);
        assert_eq!(info.columns[0].name, "City");
        assert_eq!(info.columns[0].non_null, 3);
        assert_eq!(info.columns[1].dtype, "Float64");
        assert_eq!(info.columns[2].non_null, 0);
    }

    #[test]
    fn test_describe_numeric_column() {
        let descriptions = describe(&sample()).unwrap();
        match &descriptions[1] {
            ColumnDescription::Numeric { column, count, mean, std, min, median, max, .. } => {
                assert_eq!(column, "RSPM");
                assert_eq!(*count, 3);
                assert_eq!(*mean, Some(20.0));
                assert_eq!(*std, Some(10.0));
                assert_eq!(*min, Some(10.0));
                assert_eq!(*median, Some(20.0));
                assert_eq!(*max, Some(30.0));
            }
            other => panic!("expected numeric description, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_all_missing_column() {
        let descriptions = describe(&sample()).unwrap();
        match &descriptions[2] {
            ColumnDescription::Numeric { count, mean, std, q25, .. } => {
                assert_eq!(*count, 0);
                assert_eq!(*mean, None);
                assert_eq!(*std, None);
                assert_eq!(*q25, None);
            }
            other => panic!("expected numeric description, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_text_column() {
        let descriptions = describe(&sample()).unwrap();
        assert_eq!(
            descriptions[0],
            ColumnDescription::Text {
                column: "City".into(),
                count: 3,
                unique: 2,
                top: Some("Patna".into()),
                freq: 2,
            }
        );
    }
}
