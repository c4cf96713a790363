//! Imputation module for handling missing values.
//!
//! Numeric target columns are filled with their mean; see [`MeanImputer`].

mod statistical;

pub use statistical::MeanImputer;
