//! Air Quality Analysis Library
//!
//! An exploratory analysis pipeline for air-quality monitoring exports, built
//! with Rust and Polars.
//!
//! # Overview
//!
//! One run of the pipeline goes through these stages:
//!
//! - **Loading**: decode the delimited file under a declared encoding and
//!   apply the declared column types
//! - **Normalization**: rename source columns to canonical names
//! - **Profiling**: missing values per column, column types, summary statistics
//! - **Imputation**: fill missing pollutant readings with the column mean
//! - **Aggregation**: value frequencies, grouped means and pollutant correlation
//! - **Reporting**: a text report, a JSON document and three charts
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use airq::{AnalysisConfig, Pipeline};
//! use airq::reporting::text::render_report;
//!
//! let config = AnalysisConfig::builder()
//!     .input_path("air/data.csv")
//!     .encoding("latin1")
//!     .build()?;
//!
//! let report = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("{}", render_report(&report));
//! airq::charts::show_blocking(airq::charts::build_charts(&report))?;
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to change the input, the column sets or the
//! handling of columns that have no values at all:
//!
//! ```rust,ignore
//! use airq::config::*;
//!
//! let config = AnalysisConfig::builder()
//!     .top_states(10)
//!     .state_sort_column("Sulphur_Dioxide")
//!     .undefined_mean_policy(UndefinedMeanPolicy::Fail)
//!     .build()?;
//! ```

pub mod aggregation;
pub mod charts;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod normalizer;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, UndefinedMeanPolicy,
};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use imputers::MeanImputer;
pub use normalizer::{RenameMap, normalize_columns};
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use schema::{ColumnSpec, DeclaredType, TableSchema};
pub use types::{
    AnalysisReport, ColumnDescription, CorrelationMatrix, DatasetInfo, FrequencyTable,
    GroupAggregate, GroupMeans, ImputationOutcome, NullRate,
};
