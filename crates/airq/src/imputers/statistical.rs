//! Mean imputation of numeric target columns.

use crate::config::UndefinedMeanPolicy;
use crate::error::{AnalysisError, Result};
use crate::types::ImputationOutcome;
use crate::utils::float_series;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Fills missing numeric cells with the mean of the column's present values.
pub struct MeanImputer;

impl MeanImputer {
    /// Impute every column in `columns`, in order, mutating `df` in place.
    ///
    /// A column without missing cells is left alone and its mean is never
    /// computed. A column without any present value cannot be filled; what
    /// happens then depends on `policy`.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::ColumnNotFound`] if a target column is absent
    /// - [`AnalysisError::SchemaMismatch`] if a target column is not numeric
    /// - [`AnalysisError::UndefinedMean`] for an all-missing column under
    ///   [`UndefinedMeanPolicy::Fail`]
    pub fn impute<S: AsRef<str>>(
        df: &mut DataFrame,
        columns: &[S],
        policy: UndefinedMeanPolicy,
    ) -> Result<Vec<ImputationOutcome>> {
        let mut outcomes = Vec::with_capacity(columns.len());
        for column in columns {
            outcomes.push(Self::impute_column(df, column.as_ref(), policy)?);
        }
        Ok(outcomes)
    }

    /// Impute a single column.
    pub fn impute_column(
        df: &mut DataFrame,
        col_name: &str,
        policy: UndefinedMeanPolicy,
    ) -> Result<ImputationOutcome> {
        let series = float_series(df, col_name)?;
        let missing = series.null_count();

        if missing == 0 {
            debug!("Column '{}' has no missing values", col_name);
            return Ok(ImputationOutcome::Complete {
                column: col_name.to_string(),
            });
        }

        let Some(mean) = series.mean() else {
            return match policy {
                UndefinedMeanPolicy::Fail => {
                    Err(AnalysisError::UndefinedMean(col_name.to_string()))
                }
                UndefinedMeanPolicy::Warn => {
                    warn!(
                        "Column '{}' has no values; its {} missing cells stay missing",
                        col_name, missing
                    );
                    Ok(ImputationOutcome::Undefined {
                        column: col_name.to_string(),
                        missing,
                    })
                }
                UndefinedMeanPolicy::Ignore => Ok(ImputationOutcome::Undefined {
                    column: col_name.to_string(),
                    missing,
                }),
            };
        };

        let filled = series.fill_null(FillNullStrategy::Mean)?;
        df.replace(col_name, filled)?;
        info!("Filled missing values in {} with mean: {:.2}", col_name, mean);

        Ok(ImputationOutcome::Filled {
            column: col_name.to_string(),
            mean,
            filled: missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::float_values;
    use pretty_assertions::assert_eq;

    fn column_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        float_values(df, name).unwrap()
    }

    // ========================================================================
    // impute_column() tests
    // ========================================================================

    #[test]
    fn test_impute_column_basic() {
        let mut df = df![
            "RSPM" => [Some(10.0), None, Some(20.0), None],
        ]
        .unwrap();

        let outcome =
            MeanImputer::impute_column(&mut df, "RSPM", UndefinedMeanPolicy::Warn).unwrap();

        assert_eq!(
            outcome,
            ImputationOutcome::Filled { column: "RSPM".into(), mean: 15.0, filled: 2 }
        );
        assert_eq!(
            column_values(&df, "RSPM"),
            vec![Some(10.0), Some(15.0), Some(20.0), Some(15.0)]
        );
    }

    #[test]
    fn test_impute_column_preserves_mean() {
        let mut df = df![
            "SPM" => [Some(3.0), None, Some(8.0), Some(1.0), None, None],
        ]
        .unwrap();
        let before = df.column("SPM").unwrap().as_materialized_series().mean().unwrap();

        MeanImputer::impute_column(&mut df, "SPM", UndefinedMeanPolicy::Warn).unwrap();

        let after = df.column("SPM").unwrap().as_materialized_series();
        assert_eq!(after.null_count(), 0);
        assert!((after.mean().unwrap() - before).abs() < 1e-12);
    }

    #[test]
    fn test_impute_column_fills_nan_cells() {
        let mut df = df!["RSPM" => [Some(10.0), Some(f64::NAN), None, Some(30.0)]].unwrap();

        let outcome =
            MeanImputer::impute_column(&mut df, "RSPM", UndefinedMeanPolicy::Warn).unwrap();

        assert_eq!(
            outcome,
            ImputationOutcome::Filled { column: "RSPM".into(), mean: 20.0, filled: 2 }
        );
        assert_eq!(
            column_values(&df, "RSPM"),
            vec![Some(10.0), Some(20.0), Some(20.0), Some(30.0)]
        );
    }

    #[test]
    fn test_impute_column_integer_column() {
        let mut df = df!["SO2" => [Some(1i64), None, Some(4)]].unwrap();

        MeanImputer::impute_column(&mut df, "SO2", UndefinedMeanPolicy::Warn).unwrap();

        let column = df.column("SO2").unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column_values(&df, "SO2"), vec![Some(1.0), Some(2.5), Some(4.0)]);
    }

    #[test]
    fn test_impute_column_complete_is_untouched() {
        let mut df = df!["SO2" => [1.0, 2.0, 3.0]].unwrap();
        let original = df.clone();

        let outcome =
            MeanImputer::impute_column(&mut df, "SO2", UndefinedMeanPolicy::Warn).unwrap();

        assert_eq!(outcome, ImputationOutcome::Complete { column: "SO2".into() });
        assert!(df.equals_missing(&original));
    }

    #[test]
    fn test_impute_column_all_missing_ignore_and_warn() {
        for policy in [UndefinedMeanPolicy::Ignore, UndefinedMeanPolicy::Warn] {
            let mut df = df!["SPM" => [None::<f64>, None, None]].unwrap();

            let outcome = MeanImputer::impute_column(&mut df, "SPM", policy).unwrap();

            assert_eq!(
                outcome,
                ImputationOutcome::Undefined { column: "SPM".into(), missing: 3 }
            );
            assert_eq!(df.column("SPM").unwrap().null_count(), 3);
        }
    }

    #[test]
    fn test_impute_column_all_missing_fail() {
        let mut df = df!["SPM" => [None::<f64>, None]].unwrap();

        let err =
            MeanImputer::impute_column(&mut df, "SPM", UndefinedMeanPolicy::Fail).unwrap_err();

        assert!(matches!(err, AnalysisError::UndefinedMean(ref c) if c == "SPM"));
    }

    #[test]
    fn test_impute_column_missing_column() {
        let mut df = df!["other" => [1.0]].unwrap();

        let err =
            MeanImputer::impute_column(&mut df, "RSPM", UndefinedMeanPolicy::Warn).unwrap_err();

        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    // ========================================================================
    // impute() tests
    // ========================================================================

    #[test]
    fn test_impute_mixed_area_scenario() {
        let mut df = df![
            "Area_Category" => ["Residential", "Residential", "Industrial"],
            "Sulphur_Dioxide" => [Some(10.0), None, Some(30.0)],
            "Nitrogen_Dioxide" => [None, Some(20.0), Some(40.0)],
        ]
        .unwrap();

        let outcomes = MeanImputer::impute(
            &mut df,
            &["Sulphur_Dioxide", "Nitrogen_Dioxide"],
            UndefinedMeanPolicy::Warn,
        )
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            column_values(&df, "Sulphur_Dioxide"),
            vec![Some(10.0), Some(20.0), Some(30.0)]
        );
        assert_eq!(
            column_values(&df, "Nitrogen_Dioxide"),
            vec![Some(30.0), Some(20.0), Some(40.0)]
        );
    }

    #[test]
    fn test_impute_leaves_other_columns_alone() {
        let mut df = df![
            "City" => [Some("Patna"), None],
            "RSPM" => [Some(4.0), None],
        ]
        .unwrap();

        MeanImputer::impute(&mut df, &["RSPM"], UndefinedMeanPolicy::Warn).unwrap();

        assert_eq!(df.column("City").unwrap().null_count(), 1);
    }
}
