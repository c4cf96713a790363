//! Grouped means of numeric columns.

use crate::error::Result;
use crate::types::{GroupAggregate, GroupMeans};
use crate::utils::{float_values, text_values};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

struct Accumulator {
    rows: usize,
    sums: Vec<f64>,
    counts: Vec<usize>,
}

/// Mean of each value column per distinct key of `group_column`.
///
/// Missing cells are left out of both sum and count, so a group with no
/// values in a column gets `None` there. Rows with a missing key belong to
/// no group. Groups are ordered by key.
pub fn group_means<S: AsRef<str>>(
    df: &DataFrame,
    group_column: &str,
    value_columns: &[S],
) -> Result<GroupAggregate> {
    let keys = text_values(df, group_column)?;
    let columns: Vec<Vec<Option<f64>>> = value_columns
        .iter()
        .map(|c| float_values(df, c.as_ref()))
        .collect::<Result<_>>()?;

    let width = columns.len();
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for (row, key) in keys.iter().enumerate() {
        let Some(key) = key else {
            continue;
        };
        let acc = groups.entry(key.as_str()).or_insert_with(|| Accumulator {
            rows: 0,
            sums: vec![0.0; width],
            counts: vec![0; width],
        });
        acc.rows += 1;
        for (i, column) in columns.iter().enumerate() {
            if let Some(v) = column[row] {
                acc.sums[i] += v;
                acc.counts[i] += 1;
            }
        }
    }

    let rows: Vec<GroupMeans> = groups
        .into_iter()
        .map(|(key, acc)| GroupMeans {
            key: key.to_string(),
            row_count: acc.rows,
            means: acc
                .sums
                .iter()
                .zip(&acc.counts)
                .map(|(sum, &count)| (count > 0).then(|| sum / count as f64))
                .collect(),
        })
        .collect();

    debug!("Grouped by '{}' into {} groups", group_column, rows.len());

    Ok(GroupAggregate {
        group_column: group_column.to_string(),
        value_columns: value_columns.iter().map(|c| c.as_ref().to_string()).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn imputed_table() -> DataFrame {
        df![
            "Area_Category" => [Some("Residential"), Some("Residential"), Some("Industrial"), None],
            "State" => ["Goa", "Assam", "Goa", "Assam"],
            "Sulphur_Dioxide" => [10.0, 20.0, 30.0, 99.0],
            "Nitrogen_Dioxide" => [30.0, 20.0, 40.0, 99.0],
            "SPM" => [None::<f64>, None, None, None],
        ]
        .unwrap()
    }

    #[test]
    fn test_group_means_by_area() {
        let agg = group_means(
            &imputed_table(),
            "Area_Category",
            &["Sulphur_Dioxide", "Nitrogen_Dioxide"],
        )
        .unwrap();

        assert_eq!(
            agg.rows,
            vec![
                GroupMeans {
                    key: "Industrial".into(),
                    row_count: 1,
                    means: vec![Some(30.0), Some(40.0)],
                },
                GroupMeans {
                    key: "Residential".into(),
                    row_count: 2,
                    means: vec![Some(15.0), Some(25.0)],
                },
            ]
        );
    }

    #[test]
    fn test_group_means_all_missing_column() {
        let agg = group_means(&imputed_table(), "State", &["SPM"]).unwrap();
        assert!(agg.rows.iter().all(|r| r.means == vec![None]));
    }

    #[test]
    fn test_weighted_group_means_reproduce_overall_mean() {
        let df = df![
            "State" => ["Goa", "Goa", "Kerala", "Delhi", "Delhi", "Delhi"],
            "RSPM" => [12.0, 18.0, 50.0, 101.0, 97.0, 120.0],
        ]
        .unwrap();

        let agg = group_means(&df, "State", &["RSPM"]).unwrap();
        let total_rows: usize = agg.rows.iter().map(|r| r.row_count).sum();
        let weighted: f64 = agg
            .rows
            .iter()
            .map(|r| r.means[0].unwrap() * r.row_count as f64)
            .sum::<f64>()
            / total_rows as f64;

        let overall = df.column("RSPM").unwrap().as_materialized_series().mean().unwrap();
        assert!((weighted - overall).abs() < 1e-9);
    }

    #[test]
    fn test_group_means_unknown_group_column() {
        let err = group_means(&imputed_table(), "Region", &["SPM"]).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_group_means_rejects_text_value_column() {
        let err = group_means(&imputed_table(), "Area_Category", &["State"]).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    }
}
