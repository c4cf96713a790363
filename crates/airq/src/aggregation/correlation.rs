//! Pearson correlation over pairwise-complete rows.

use anofox_statistics::correlation;
use crate::error::Result;
use crate::types::CorrelationMatrix;
use crate::utils::float_values;
use polars::prelude::*;
use tracing::debug;

/// Pearson correlation matrix of `columns`.
///
/// Each pair uses only the rows where both cells are present. A pair with
/// fewer than three such rows or with zero variance gets NaN, including on
/// the diagonal; every other diagonal entry is exactly 1.0.
pub fn pearson_matrix<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<CorrelationMatrix> {
    let labels: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
    let series_values: Vec<Vec<Option<f64>>> = labels
        .iter()
        .map(|name| float_values(df, name))
        .collect::<Result<_>>()?;

    let size = labels.len();
    let mut values = vec![vec![f64::NAN; size]; size];

    for i in 0..size {
        for j in i..size {
            let (x, y) = complete_pairs(&series_values[i], &series_values[j]);
            let mut r = pearson(&x, &y);
            if i == j && !r.is_nan() {
                r = 1.0;
            }
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { labels, values })
}

/// Pearson correlation coefficient of two equally long samples.
///
/// NaN whenever the coefficient is undefined, e.g. for a constant sample.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 {
        return f64::NAN;
    }

    match correlation::pearson(x, y, None) {
        Ok(result) => result.estimate,
        Err(e) => {
            debug!("Pearson correlation undefined over {} pairs: {}", x.len(), e);
            f64::NAN
        }
    }
}

fn complete_pairs(a: &[Option<f64>], b: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGETS: [&str; 4] = ["Sulphur_Dioxide", "Nitrogen_Dioxide", "RSPM", "SPM"];

    fn pollutants() -> DataFrame {
        df![
            "Sulphur_Dioxide" => [4.8, 3.1, 6.2, 8.0, 5.5],
            "Nitrogen_Dioxide" => [17.4, 7.0, 28.5, 33.1, 20.0],
            "RSPM" => [80.0, 60.0, 75.0, 120.0, 95.0],
            "SPM" => [200.0, 150.0, 230.0, 310.0, 180.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_inputs() {
        assert!(pearson(&[], &[]).is_nan());
        assert!(pearson(&[1.0], &[2.0]).is_nan());
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_nan());
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_nan());
    }

    #[test]
    fn test_pearson_known_value() {
        // 6 / sqrt(60)
        let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0]);
        assert!((r - 0.7745966692414834).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let matrix = pearson_matrix(&pollutants(), &TARGETS).unwrap();

        assert_eq!(matrix.size(), 4);
        for i in 0..4 {
            assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..4 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
                assert!(matrix.values[i][j].abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_matrix_uses_pairwise_complete_rows() {
        let df = df![
            "a" => [Some(1.0), Some(2.0), Some(3.0), None],
            "b" => [Some(2.0), Some(4.0), Some(6.0), Some(100.0)],
        ]
        .unwrap();

        let matrix = pearson_matrix(&df, &["a", "b"]).unwrap();
        assert!((matrix.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_all_missing_column_is_nan() {
        let df = df![
            "a" => [1.0, 2.0, 3.0],
            "SPM" => [None::<f64>, None, None],
        ]
        .unwrap();

        let matrix = pearson_matrix(&df, &["a", "SPM"]).unwrap();
        assert!(matrix.get("SPM", "SPM").unwrap().is_nan());
        assert!(matrix.get("a", "SPM").unwrap().is_nan());
        assert_eq!(matrix.get("a", "a"), Some(1.0));
    }

    #[test]
    fn test_matrix_missing_column() {
        let err = pearson_matrix(&pollutants(), &["PM10"]).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }
}
