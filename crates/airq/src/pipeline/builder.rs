//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the analysis workflow, from loading the input file to an
//! [`AnalysisReport`].

use crate::aggregation::{group_means, pearson_matrix, value_frequencies};
use crate::config::{AnalysisConfig, UndefinedMeanPolicy};
use crate::error::{Result, ResultExt};
use crate::imputers::MeanImputer;
use crate::loader;
use crate::normalizer::normalize_columns;
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler;
use crate::types::{AnalysisReport, ImputationOutcome};
use chrono::Utc;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The main analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use airq::{AnalysisConfig, Pipeline};
///
/// // Load, analyze and report on the configured input file
/// let report = Pipeline::builder()
///     .config(AnalysisConfig::builder().input_path("air/data.csv").build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run()?;
///
/// // Analyze a table that is already in memory
/// let report = Pipeline::builder().build()?.analyze(dataframe)?;
/// ```
pub struct Pipeline {
    config: AnalysisConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load the configured input file and analyze it.
    ///
    /// # Errors
    ///
    /// Any loading error ([`NotFound`](crate::AnalysisError::NotFound),
    /// [`Decode`](crate::AnalysisError::Decode),
    /// [`SchemaMismatch`](crate::AnalysisError::SchemaMismatch)) or any
    /// error raised by [`analyze`](Self::analyze).
    pub fn run(&self) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        let result = self.load().and_then(|df| self.analyze_internal(df, start_time));
        self.finish(result).map(|mut report| {
            report.input_path = Some(self.config.input_path.display().to_string());
            report
        })
    }

    /// Analyze a table that is already loaded.
    ///
    /// The table goes through the same stages as in [`run`](Self::run),
    /// starting at column normalization.
    pub fn analyze(&self, df: DataFrame) -> Result<AnalysisReport> {
        let result = self.analyze_internal(df, Instant::now());
        self.finish(result)
    }

    /// Report the terminal progress state and log failures.
    fn finish(&self, result: Result<AnalysisReport>) -> Result<AnalysisReport> {
        match result {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn load(&self) -> Result<DataFrame> {
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            0.0,
            format!("Reading {}...", self.config.input_path.display()),
        ));
        info!("Step 1: Loading {}", self.config.input_path.display());

        let df = loader::read_table(
            &self.config.input_path,
            &self.config.encoding,
            &self.config.schema,
        )?;

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            1.0,
            format!("Loaded {} rows", df.height()),
        ));
        Ok(df)
    }

    fn analyze_internal(&self, df: DataFrame, start_time: Instant) -> Result<AnalysisReport> {
        let config = &self.config;
        let shape = df.shape();
        let mut warnings = Vec::new();

        // Step 2: canonical column names
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Normalizing,
            0.0,
            "Renaming columns...",
        ));
        info!("Step 2: Normalizing column names...");
        let (mut df, renames) = normalize_columns(df, &config.rename_map)?;
        debug!("Applied {} renames", renames.len());

        // Step 3: profile before anything is filled in
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Profiling,
            0.0,
            "Profiling dataset...",
        ));
        info!("Step 3: Profiling dataset...");
        let null_rates = profiler::null_rates(&df);
        let info = profiler::dataset_info(&df);
        let description = profiler::describe(&df).context("Describing dataset")?;

        // Step 4: mean imputation, one column at a time
        info!("Step 4: Imputing numeric columns...");
        let total = config.numeric_columns.len();
        let mut imputation = Vec::with_capacity(total);
        for (i, column) in config.numeric_columns.iter().enumerate() {
            self.report_progress(ProgressUpdate::with_items(
                AnalysisStage::Imputation,
                format!("Column: {}", column),
                i,
                total,
                format!("Imputing {}", column),
            ));
            let outcome =
                MeanImputer::impute_column(&mut df, column, config.undefined_mean_policy)
                    .context(format!("Imputing column '{}'", column))?;
            if let ImputationOutcome::Undefined { column, missing } = &outcome
                && config.undefined_mean_policy == UndefinedMeanPolicy::Warn
            {
                warnings.push(format!(
                    "Column '{}' has no values; {} missing cells left unimputed",
                    column, missing
                ));
            }
            imputation.push(outcome);
        }

        // Step 5: frequencies, grouped means, correlation
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Aggregation,
            0.0,
            "Counting categorical values...",
        ));
        info!("Step 5: Aggregating...");
        let frequencies = value_frequencies(&df, &config.categorical_columns)
            .context("Computing value frequencies")?;

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Aggregation,
            0.3,
            format!("Averaging by {}...", config.area_group_column),
        ));
        let area_aggregate = group_means(&df, &config.area_group_column, &config.numeric_columns)
            .context("Averaging by area category")?;

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Aggregation,
            0.6,
            format!("Averaging by {}...", config.state_group_column),
        ));
        let state_aggregate =
            group_means(&df, &config.state_group_column, &config.state_value_columns)
                .context("Averaging by state")?
                .sort_by_column_desc(&config.state_sort_column);

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Aggregation,
            0.8,
            "Correlating pollutants...",
        ));
        let correlation = pearson_matrix(&df, &config.numeric_columns)
            .context("Correlating pollutants")?;

        // Step 6: assemble
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Reporting,
            0.0,
            "Building report...",
        ));
        let duration_ms = start_time.elapsed().as_millis() as u64;
        let report = AnalysisReport {
            generated_at: Utc::now(),
            duration_ms,
            input_path: None,
            shape,
            info,
            null_rates,
            description,
            renames,
            imputation,
            frequencies,
            area_aggregate,
            state_aggregate,
            state_sort_column: config.state_sort_column.clone(),
            top_states: config.top_states,
            correlation,
            warnings,
        };

        info!(
            "Analysis finished in {}ms: {} cells imputed, {} warnings",
            duration_ms,
            report.cells_imputed(),
            report.warnings.len()
        );
        Ok(report)
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnalysisConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the analysis configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during analysis.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use airq::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct MyReporter;
    ///
    /// impl ProgressReporter for MyReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         println!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(MyReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// Convenience over [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn source_frame() -> DataFrame {
        df![
            "state" => ["Bihar", "Bihar", "Assam"],
            "location" => ["Patna", "Patna", "Guwahati"],
            "type" => [Some("Residential"), Some("Residential"), Some("Industrial")],
            "so2" => [Some(10.0), Some(20.0), Some(30.0)],
            "no2" => [Some(20.0), Some(30.0), Some(40.0)],
            "rspm" => [Some(5.0), None, Some(7.0)],
            "spm" => [None::<f64>, None, None],
        ]
        .unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert!(pipeline.progress_reporter.is_none());
        assert_eq!(pipeline.config().top_states, 5);
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let config = AnalysisConfig {
            top_states: 0,
            ..AnalysisConfig::default()
        };
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_analyze_small_frame() {
        let report = Pipeline::builder().build().unwrap().analyze(source_frame()).unwrap();

        assert_eq!(report.shape, (3, 7));
        assert!(report.renames.contains(&"so2 -> Sulphur_Dioxide".to_string()));
        assert_eq!(
            report.area_aggregate.mean("Residential", "Sulphur_Dioxide"),
            Some(15.0)
        );
        assert_eq!(
            report.area_aggregate.mean("Industrial", "Nitrogen_Dioxide"),
            Some(40.0)
        );
        // Assam (40) before Bihar (25)
        assert_eq!(report.state_aggregate.rows[0].key, "Assam");
        assert_eq!(report.cells_imputed(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("SPM"));
        assert!(report.input_path.is_none());
    }

    #[test]
    fn test_analyze_profiles_before_imputation() {
        let report = Pipeline::builder().build().unwrap().analyze(source_frame()).unwrap();
        let rspm = report.null_rates.iter().find(|r| r.column == "RSPM").unwrap();
        assert_eq!(rspm.missing_count, 1);
    }

    #[test]
    fn test_analyze_counts_nan_as_missing_before_imputing_it() {
        let mut df = source_frame();
        df.replace("rspm", Series::new("rspm".into(), [5.0, f64::NAN, 7.0])).unwrap();

        let report = Pipeline::builder().build().unwrap().analyze(df).unwrap();

        let rspm = report.null_rates.iter().find(|r| r.column == "RSPM").unwrap();
        assert_eq!(rspm.missing_count, 1);
        let filled = report.imputation.iter().find(|o| o.column() == "RSPM").unwrap();
        assert_eq!(filled.filled_count(), rspm.missing_count);
        assert_eq!(report.area_aggregate.mean("Residential", "RSPM"), Some(5.5));
    }

    #[test]
    fn test_analyze_fails_on_undefined_mean_under_fail_policy() {
        let config = AnalysisConfig::builder()
            .undefined_mean_policy(UndefinedMeanPolicy::Fail)
            .build()
            .unwrap();
        let err = Pipeline::builder()
            .config(config)
            .build()
            .unwrap()
            .analyze(source_frame())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNDEFINED_MEAN");
    }

    #[test]
    fn test_progress_stages_in_order() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&stages);

        let pipeline = Pipeline::builder()
            .on_progress(move |update| {
                let mut stages = seen.lock().unwrap();
                if stages.last() != Some(&update.stage) {
                    stages.push(update.stage);
                }
            })
            .build()
            .unwrap();
        pipeline.analyze(source_frame()).unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                AnalysisStage::Normalizing,
                AnalysisStage::Profiling,
                AnalysisStage::Imputation,
                AnalysisStage::Aggregation,
                AnalysisStage::Reporting,
                AnalysisStage::Complete,
            ]
        );
    }

    #[test]
    fn test_run_reports_failure_for_missing_file() {
        let failed = Arc::new(Mutex::new(false));
        let seen = Arc::clone(&failed);
        let config = AnalysisConfig::builder()
            .input_path("does/not/exist.csv")
            .build()
            .unwrap();

        let err = Pipeline::builder()
            .config(config)
            .on_progress(move |update| {
                if update.stage == AnalysisStage::Failed {
                    *seen.lock().unwrap() = true;
                }
            })
            .build()
            .unwrap()
            .run()
            .unwrap_err();

        assert!(matches!(err, AnalysisError::NotFound(_)));
        assert!(*failed.lock().unwrap());
    }
}
