//! Configuration types for the analysis pipeline.
//!
//! Every field defaults to the fixed air-quality setup: input at
//! `air/data.csv` in Latin-1, the canonical rename map, the four pollutant
//! columns as numeric targets and the three location columns as categories.

use crate::loader::encoding::resolve_encoding;
use crate::normalizer::RenameMap;
use crate::schema::TableSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default input path.
pub const DEFAULT_INPUT_PATH: &str = "air/data.csv";

/// Default text encoding label of the input file.
pub const DEFAULT_ENCODING: &str = "latin1";

/// Canonical names of the numeric target columns.
pub const NUMERIC_TARGETS: [&str; 4] = ["Sulphur_Dioxide", "Nitrogen_Dioxide", "RSPM", "SPM"];

/// Canonical names of the categorical columns.
pub const CATEGORICAL_COLUMNS: [&str; 3] = ["State", "City", "Area_Category"];

/// What to do when a target column has no values to average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedMeanPolicy {
    /// Leave the column missing without comment
    Ignore,
    /// Leave the column missing and log a warning
    #[default]
    Warn,
    /// Abort the run
    Fail,
}

/// Configuration for the analysis pipeline.
///
/// Use [`AnalysisConfig::builder()`] for a fluent setup.
///
/// # Example
///
/// ```rust,ignore
/// use airq::config::{AnalysisConfig, UndefinedMeanPolicy};
///
/// let config = AnalysisConfig::builder()
///     .input_path("data/air.csv")
///     .undefined_mean_policy(UndefinedMeanPolicy::Fail)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Path of the delimited input file.
    /// Default: "air/data.csv"
    pub input_path: PathBuf,

    /// Text encoding label; Latin-1 labels mean ISO-8859-1, the rest follow `encoding_rs`.
    /// Default: "latin1"
    pub encoding: String,

    /// Declared column types, by source column name.
    pub schema: TableSchema,

    /// Source to canonical column names.
    pub rename_map: RenameMap,

    /// Columns imputed, described and correlated.
    pub numeric_columns: Vec<String>,

    /// Columns reported as frequency distributions.
    pub categorical_columns: Vec<String>,

    /// Grouping column of the first aggregate.
    /// Default: "Area_Category"
    pub area_group_column: String,

    /// Grouping column of the second aggregate.
    /// Default: "State"
    pub state_group_column: String,

    /// Value columns of the second aggregate.
    /// Default: the two gas columns
    pub state_value_columns: Vec<String>,

    /// Column the second aggregate is sorted by, descending.
    /// Default: "Nitrogen_Dioxide"
    pub state_sort_column: String,

    /// Number of leading groups printed from the second aggregate.
    /// Default: 5
    pub top_states: usize,

    /// Handling of target columns without any value.
    /// Default: Warn
    pub undefined_mean_policy: UndefinedMeanPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            encoding: DEFAULT_ENCODING.to_string(),
            schema: TableSchema::air_quality(),
            rename_map: RenameMap::air_quality(),
            numeric_columns: NUMERIC_TARGETS.iter().map(|s| s.to_string()).collect(),
            categorical_columns: CATEGORICAL_COLUMNS.iter().map(|s| s.to_string()).collect(),
            area_group_column: "Area_Category".to_string(),
            state_group_column: "State".to_string(),
            state_value_columns: vec![
                "Sulphur_Dioxide".to_string(),
                "Nitrogen_Dioxide".to_string(),
            ],
            state_sort_column: "Nitrogen_Dioxide".to_string(),
            top_states: 5,
            undefined_mean_policy: UndefinedMeanPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if resolve_encoding(&self.encoding).is_err() {
            return Err(ConfigValidationError::UnknownEncoding(self.encoding.clone()));
        }

        if self.numeric_columns.is_empty() {
            return Err(ConfigValidationError::EmptyColumnList("numeric_columns"));
        }

        if self.state_value_columns.is_empty() {
            return Err(ConfigValidationError::EmptyColumnList("state_value_columns"));
        }

        if !self.state_value_columns.contains(&self.state_sort_column) {
            return Err(ConfigValidationError::SortColumnNotAggregated(
                self.state_sort_column.clone(),
            ));
        }

        if self.top_states == 0 {
            return Err(ConfigValidationError::InvalidTopStates(self.top_states));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Unknown text encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Column list '{0}' must not be empty")]
    EmptyColumnList(&'static str),

    #[error("Sort column '{0}' is not one of the aggregated state columns")]
    SortColumnNotAggregated(String),

    #[error("Invalid top states count: {0} (must be at least 1)")]
    InvalidTopStates(usize),
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    input_path: Option<PathBuf>,
    encoding: Option<String>,
    schema: Option<TableSchema>,
    rename_map: Option<RenameMap>,
    numeric_columns: Option<Vec<String>>,
    categorical_columns: Option<Vec<String>>,
    state_value_columns: Option<Vec<String>>,
    state_sort_column: Option<String>,
    top_states: Option<usize>,
    undefined_mean_policy: Option<UndefinedMeanPolicy>,
}

impl AnalysisConfigBuilder {
    /// Set the input file path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the text encoding label (e.g. "latin1", "utf-8").
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Replace the declared schema.
    pub fn schema(mut self, schema: TableSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Replace the rename map.
    pub fn rename_map(mut self, map: RenameMap) -> Self {
        self.rename_map = Some(map);
        self
    }

    /// Set the numeric target columns (canonical names).
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the categorical columns (canonical names).
    pub fn categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the value columns of the state aggregate.
    pub fn state_value_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_value_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the column the state aggregate is ranked by.
    pub fn state_sort_column(mut self, column: impl Into<String>) -> Self {
        self.state_sort_column = Some(column.into());
        self
    }

    /// Set how many top states are printed.
    pub fn top_states(mut self, n: usize) -> Self {
        self.top_states = Some(n);
        self
    }

    /// Set the policy for columns whose mean is undefined.
    pub fn undefined_mean_policy(mut self, policy: UndefinedMeanPolicy) -> Self {
        self.undefined_mean_policy = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            encoding: self.encoding.unwrap_or(defaults.encoding),
            schema: self.schema.unwrap_or(defaults.schema),
            rename_map: self.rename_map.unwrap_or(defaults.rename_map),
            numeric_columns: self.numeric_columns.unwrap_or(defaults.numeric_columns),
            categorical_columns: self
                .categorical_columns
                .unwrap_or(defaults.categorical_columns),
            area_group_column: defaults.area_group_column,
            state_group_column: defaults.state_group_column,
            state_value_columns: self
                .state_value_columns
                .unwrap_or(defaults.state_value_columns),
            state_sort_column: self.state_sort_column.unwrap_or(defaults.state_sort_column),
            top_states: self.top_states.unwrap_or(defaults.top_states),
            undefined_mean_policy: self.undefined_mean_policy.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
