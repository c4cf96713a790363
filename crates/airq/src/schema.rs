//! Declared column types for the input file.
//!
//! The loader reads every cell as text and then applies a [`TableSchema`]:
//! declared columns must exist and parse as their declared type, undeclared
//! columns pass through with an inferred type.

use serde::{Deserialize, Serialize};

/// Logical type of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    Text,
    Float,
}

/// One `(column name, declared type)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub dtype: DeclaredType,
}

impl ColumnSpec {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: DeclaredType::Text,
        }
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: DeclaredType::Float,
        }
    }
}

/// Ordered list of declared columns, keyed by their names in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Schema of the air-quality monitoring export, using source column names.
    pub fn air_quality() -> Self {
        Self::new(vec![
            ColumnSpec::text("state"),
            ColumnSpec::text("location"),
            ColumnSpec::text("type"),
            ColumnSpec::float("so2"),
            ColumnSpec::float("no2"),
            ColumnSpec::float("rspm"),
            ColumnSpec::float("spm"),
        ])
    }

    /// Look up the declared type of a column.
    pub fn declared_type(&self, name: &str) -> Option<DeclaredType> {
        self.columns
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.dtype)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::air_quality()
    }
}
