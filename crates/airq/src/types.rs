use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullRate {
    pub column: String,
    pub missing_count: usize,
    /// Share of all rows, 0.0 - 100.0.
    pub missing_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
}

/// Shape and per-column types of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

/// Summary statistics of one column.
///
/// Numeric columns carry the usual location and spread measures; text
/// columns carry the distinct count and the most frequent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnDescription {
    Numeric {
        column: String,
        count: usize,
        mean: Option<f64>,
        /// Sample standard deviation (n - 1).
        std: Option<f64>,
        min: Option<f64>,
        q25: Option<f64>,
        median: Option<f64>,
        q75: Option<f64>,
        max: Option<f64>,
    },
    Text {
        column: String,
        count: usize,
        unique: usize,
        top: Option<String>,
        freq: usize,
    },
}

impl ColumnDescription {
    pub fn column(&self) -> &str {
        match self {
            Self::Numeric { column, .. } | Self::Text { column, .. } => column,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric { .. })
    }
}

/// What mean imputation did to one target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImputationOutcome {
    /// `filled` missing cells were replaced with `mean`.
    Filled {
        column: String,
        mean: f64,
        filled: usize,
    },
    /// The column had no missing cells.
    Complete { column: String },
    /// The column had no values at all, so nothing could be filled.
    Undefined { column: String, missing: usize },
}

impl ImputationOutcome {
    pub fn column(&self) -> &str {
        match self {
            Self::Filled { column, .. }
            | Self::Complete { column }
            | Self::Undefined { column, .. } => column,
        }
    }

    /// Number of cells written.
    pub fn filled_count(&self) -> usize {
        match self {
            Self::Filled { filled, .. } => *filled,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
    /// Share of all rows, 0.0 - 100.0.
    pub percentage: f64,
}

/// Relative frequency of each distinct value of one column, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub column: String,
    pub total_rows: usize,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Total share of the non-missing values.
    pub fn covered_percentage(&self) -> f64 {
        self.entries.iter().map(|e| e.percentage).sum()
    }
}

/// Means of the value columns for one group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMeans {
    pub key: String,
    pub row_count: usize,
    /// One entry per value column; `None` when the group has no value there.
    pub means: Vec<Option<f64>>,
}

/// Grouped means, one row per distinct key of `group_column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    pub group_column: String,
    pub value_columns: Vec<String>,
    pub rows: Vec<GroupMeans>,
}

impl GroupAggregate {
    /// Position of a value column in `means`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.value_columns.iter().position(|c| c == column)
    }

    /// Mean of `column` for group `key`.
    pub fn mean(&self, key: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .find(|r| r.key == key)
            .and_then(|r| r.means[idx])
    }

    /// Rows ordered by `column` descending. Ties keep key order, groups
    /// without a value go last. Unknown columns leave the order unchanged.
    pub fn sort_by_column_desc(&self, column: &str) -> GroupAggregate {
        let mut sorted = self.clone();
        let Some(idx) = self.column_index(column) else {
            return sorted;
        };

        sorted.rows.sort_by(|a, b| match (a.means[idx], b.means[idx]) {
            (Some(x), Some(y)) => y
                .partial_cmp(&x)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.key.cmp(&b.key),
        });
        sorted
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> GroupAggregate {
        GroupAggregate {
            group_column: self.group_column.clone(),
            value_columns: self.value_columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Square Pearson matrix; `values[i][j]` pairs `labels[i]` with `labels[j]`.
///
/// Serialize-only: NaN entries are written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// NaN where the coefficient is undefined (serialized as `null`).
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.values[i][j])
    }
}

/// Everything one analysis run produced. Serialize-only, like its
/// correlation matrix.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_path: Option<String>,
    /// (rows, columns) as loaded.
    pub shape: (usize, usize),
    /// Column listing after renaming.
    pub info: DatasetInfo,
    /// Missing values before imputation.
    pub null_rates: Vec<NullRate>,
    /// Summary statistics before imputation.
    pub description: Vec<ColumnDescription>,
    /// Applied renames as "old -> new".
    pub renames: Vec<String>,
    pub imputation: Vec<ImputationOutcome>,
    pub frequencies: Vec<FrequencyTable>,
    /// Means of every numeric target per area category.
    pub area_aggregate: GroupAggregate,
    /// Gas means per state, highest `state_sort_column` first.
    pub state_aggregate: GroupAggregate,
    pub state_sort_column: String,
    /// How many leading states the text report lists.
    pub top_states: usize,
    pub correlation: CorrelationMatrix,
    /// Notes raised along the way, e.g. columns left unimputed.
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    /// Leading rows of the sorted state aggregate.
    pub fn top_states(&self) -> GroupAggregate {
        self.state_aggregate.head(self.top_states)
    }

    /// Number of cells filled by imputation.
    pub fn cells_imputed(&self) -> usize {
        self.imputation.iter().map(ImputationOutcome::filled_count).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state_aggregate() -> GroupAggregate {
        GroupAggregate {
            group_column: "State".to_string(),
            value_columns: vec!["Sulphur_Dioxide".to_string(), "Nitrogen_Dioxide".to_string()],
            rows: vec![
                GroupMeans {
                    key: "Assam".into(),
                    row_count: 2,
                    means: vec![Some(5.0), Some(20.0)],
                },
                GroupMeans { key: "Bihar".into(), row_count: 1, means: vec![Some(9.0), None] },
                GroupMeans {
                    key: "Delhi".into(),
                    row_count: 3,
                    means: vec![Some(8.0), Some(60.0)],
                },
                GroupMeans { key: "Goa".into(), row_count: 1, means: vec![Some(1.0), Some(20.0)] },
            ],
        }
    }

    fn keys(agg: &GroupAggregate) -> Vec<&str> {
        agg.rows.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn test_sort_by_column_desc() {
        let sorted = state_aggregate().sort_by_column_desc("Nitrogen_Dioxide");
        // ties by key, missing last
        assert_eq!(keys(&sorted), vec!["Delhi", "Assam", "Goa", "Bihar"]);
    }

    #[test]
    fn test_sort_by_unknown_column_keeps_order() {
        let agg = state_aggregate();
        assert_eq!(agg.sort_by_column_desc("SPM"), agg);
    }

    #[test]
    fn test_head() {
        let agg = state_aggregate();
        assert_eq!(keys(&agg.head(2)), vec!["Assam", "Bihar"]);
        assert_eq!(agg.head(10).rows.len(), 4);
        assert!(agg.head(0).is_empty());
    }

    #[test]
    fn test_group_mean_lookup() {
        let agg = state_aggregate();
        assert_eq!(agg.mean("Delhi", "Nitrogen_Dioxide"), Some(60.0));
        assert_eq!(agg.mean("Bihar", "Nitrogen_Dioxide"), None);
        assert_eq!(agg.mean("Kerala", "Sulphur_Dioxide"), None);
    }

    #[test]
    fn test_imputation_outcome_serialization() {
        let outcome = ImputationOutcome::Filled {
            column: "RSPM".to_string(),
            mean: 12.5,
            filled: 3,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"outcome\":\"filled\""));
        assert_eq!(outcome.filled_count(), 3);
        assert_eq!(outcome.column(), "RSPM");

        let undefined = ImputationOutcome::Undefined { column: "SPM".into(), missing: 4 };
        assert_eq!(undefined.filled_count(), 0);
    }

    static_assertions::assert_not_impl_any!(CorrelationMatrix: serde::de::DeserializeOwned);
    static_assertions::assert_not_impl_any!(AnalysisReport: serde::de::DeserializeOwned);

    #[test]
    fn test_correlation_nan_serializes_as_null() {
        let matrix = CorrelationMatrix {
            labels: vec!["a".into(), "b".into()],
            values: vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
        };
        let json = serde_json::to_string(&matrix).unwrap();
        assert!(json.contains("null"));
        assert_eq!(matrix.get("a", "a"), Some(1.0));
        assert!(matrix.get("a", "b").unwrap().is_nan());
        assert_eq!(matrix.get("a", "z"), None);
    }

    #[test]
    fn test_column_description_accessors() {
        let text = ColumnDescription::Text {
            column: "City".into(),
            count: 3,
            unique: 2,
            top: Some("Patna".into()),
            freq: 2,
        };
        assert_eq!(text.column(), "City");
        assert!(!text.is_numeric());
    }
}
