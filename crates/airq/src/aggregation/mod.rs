//! Aggregate statistics over the imputed table.
//!
//! This module provides:
//! - Value frequencies of categorical columns
//! - Grouped means of numeric columns
//! - Pairwise Pearson correlation

pub mod correlation;
pub mod frequency;
pub mod group;

pub use correlation::{pearson, pearson_matrix};
pub use frequency::value_frequencies;
pub use group::group_means;
