//! Custom error types for the analysis pipeline.
//!
//! Every stage returns [`AnalysisError`]. None of them is recovered from: the
//! binary reports the error chain and exits with a non-zero status.
//!
//! Errors are serializable so that `--json` consumers get a stable
//! `{code, message}` shape.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file's bytes are not valid under the declared encoding.
    #[error("Failed to decode {} as {encoding}", .path.display())]
    Decode { encoding: String, path: PathBuf },

    /// The encoding label is not known to the decoder.
    #[error("Unknown text encoding '{0}'")]
    UnknownEncoding(String),

    /// A declared column is missing or holds values of the wrong type.
    #[error("Schema mismatch in column '{column}': {reason}")]
    SchemaMismatch { column: String, reason: String },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Mean of a column with no values was requested under a failing policy.
    #[error("Mean of column '{0}' is undefined: no values present")]
    UndefinedMean(String),

    /// Chart backend failure.
    #[error("Failed to render charts: {0}")]
    Render(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::UnknownEncoding(_) => "UNKNOWN_ENCODING",
            Self::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::UndefinedMean(_) => "UNDEFINED_MEAN",
            Self::Render(_) => "RENDER_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from reading the input file.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::NotFound(_) | Self::Decode { .. } | Self::SchemaMismatch { .. } => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}
