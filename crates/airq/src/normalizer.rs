//! Column renaming to canonical names.

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered `(source, canonical)` column name pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameMap {
    pub pairs: Vec<(String, String)>,
}

impl RenameMap {
    pub fn new<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }

    /// The fixed map of the air-quality export.
    pub fn air_quality() -> Self {
        Self::new([
            ("state", "State"),
            ("location", "City"),
            ("type", "Area_Category"),
            ("so2", "Sulphur_Dioxide"),
            ("no2", "Nitrogen_Dioxide"),
            ("rspm", "RSPM"),
            ("spm", "SPM"),
        ])
    }

    /// Canonical name for a source column, if mapped.
    pub fn canonical(&self, source: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(from, _)| from == source)
            .map(|(_, to)| to.as_str())
    }

    /// Source names of the map.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(from, _)| from.as_str())
    }
}

impl Default for RenameMap {
    fn default() -> Self {
        Self::air_quality()
    }
}

/// Rename every column that appears as a source key in `map`.
///
/// Unmapped columns keep their names; values and row order are untouched.
/// Returns the table and one `"old -> new"` entry per applied rename.
pub fn normalize_columns(mut df: DataFrame, map: &RenameMap) -> Result<(DataFrame, Vec<String>)> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut applied = Vec::new();
    for (from, to) in &map.pairs {
        if from == to || !present.contains(from) {
            continue;
        }
        df.rename(from, to.as_str().into())?;
        debug!("Renamed column '{}' to '{}'", from, to);
        applied.push(format!("{} -> {}", from, to));
    }

    Ok((df, applied))
}
