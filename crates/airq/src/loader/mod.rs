//! Loading the delimited input file into a table.
//!
//! Loading happens in three steps:
//!
//! 1. the whole file is read and decoded under the declared encoding
//!    ([`encoding::decode`]);
//! 2. polars parses the text with every column as a string, so no value is
//!    coerced behind our back;
//! 3. the [`TableSchema`] is applied: declared float columns are parsed
//!    strictly, undeclared columns get an inferred type.

pub mod encoding;

use crate::error::{AnalysisError, Result, ResultExt};
use crate::schema::{DeclaredType, TableSchema};
use crate::utils::{MISSING_MARKERS, is_float_like, parse_float_cell};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Read a delimited file into a table typed by `schema`.
///
/// # Errors
///
/// - [`AnalysisError::NotFound`] if `path` does not exist
/// - [`AnalysisError::UnknownEncoding`] for an unrecognized label
/// - [`AnalysisError::Decode`] if the bytes are invalid under the encoding
/// - [`AnalysisError::SchemaMismatch`] if a declared column is absent or
///   holds a value of the wrong type
pub fn read_table(path: &Path, encoding_label: &str, schema: &TableSchema) -> Result<DataFrame> {
    if !path.exists() {
        return Err(AnalysisError::NotFound(path.to_path_buf()));
    }

    let encoding = encoding::resolve_encoding(encoding_label)?;
    let bytes = std::fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    let text = encoding::decode(&bytes, encoding, path)?;
    let df = parse_csv_text(text).context(format!("Failed to parse {}", path.display()))?;
    let df = apply_schema(df, schema)?;

    info!("Dataset loaded: {:?}", df.shape());
    info!(
        "Columns: {:?}",
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
    );

    Ok(df)
}

/// Parse decoded CSV text with every column read as a string.
pub fn parse_csv_text(text: String) -> Result<DataFrame> {
    let null_values =
        NullValues::AllColumns(MISSING_MARKERS.iter().map(|m| (*m).into()).collect());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()?;

    Ok(df)
}

/// Enforce declared column types and infer the rest.
pub fn apply_schema(mut df: DataFrame, schema: &TableSchema) -> Result<DataFrame> {
    for spec in &schema.columns {
        let series = df
            .column(&spec.name)
            .map_err(|_| AnalysisError::SchemaMismatch {
                column: spec.name.clone(),
                reason: "declared column is missing from the header".to_string(),
            })?
            .as_materialized_series()
            .clone();

        match spec.dtype {
            DeclaredType::Text => {
                if series.dtype() != &DataType::String {
                    df.replace(&spec.name, series.cast(&DataType::String)?)?;
                }
            }
            DeclaredType::Float => {
                let parsed = parse_float_series(&series, &spec.name)?;
                df.replace(&spec.name, parsed)?;
            }
        }
    }

    let undeclared: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| schema.declared_type(name).is_none())
        .collect();

    for name in undeclared {
        let series = df.column(&name)?.as_materialized_series().clone();
        if series.dtype() == &DataType::String && is_float_like(&series) {
            let parsed = parse_float_series(&series, &name)?;
            df.replace(&name, parsed)?;
            debug!("Inferred column '{}' as numeric", name);
        }
    }

    Ok(df)
}

/// Parse a string series into `Float64`, rejecting the first unparseable cell.
fn parse_float_series(series: &Series, name: &str) -> Result<Series> {
    if series.dtype().is_float() {
        return Ok(series.clone());
    }
    if series.dtype() != &DataType::String {
        return Ok(series.cast(&DataType::Float64)?);
    }

    let strings = series.str()?;
    let mut values = Vec::with_capacity(strings.len());
    for (row, cell) in strings.into_iter().enumerate() {
        match cell {
            None => values.push(None),
            Some(raw) if raw.trim().is_empty() => values.push(None),
            Some(raw) => match parse_float_cell(raw) {
                Some(v) => values.push(Some(v)),
                None => {
                    return Err(AnalysisError::SchemaMismatch {
                        column: name.to_string(),
                        reason: format!("row {}: '{}' is not a number", row + 1, raw),
                    });
                }
            },
        }
    }

    Ok(Series::new(name.into(), values))
}
