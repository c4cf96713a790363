//! Relative frequencies of categorical values.

use crate::error::Result;
use crate::types::{FrequencyEntry, FrequencyTable};
use crate::utils::text_values;
use polars::prelude::*;
use std::collections::HashMap;

/// Frequency table of every column in `columns`.
///
/// Percentages are shares of all rows, so a column with missing cells sums
/// to less than 100. Entries are ordered by count descending; equal counts
/// keep the order in which the values first appear.
pub fn value_frequencies<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
) -> Result<Vec<FrequencyTable>> {
    columns
        .iter()
        .map(|column| column_frequencies(df, column.as_ref()))
        .collect()
}

fn column_frequencies(df: &DataFrame, name: &str) -> Result<FrequencyTable> {
    let values = text_values(df, name)?;
    let total_rows = values.len();

    // value -> index into `counts`, which keeps first-appearance order
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values.iter().flatten() {
        match index.get(value.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.as_str(), counts.len());
                counts.push((value.as_str(), 1));
            }
        }
    }

    // stable sort keeps first appearance among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let entries = counts
        .into_iter()
        .map(|(value, count)| FrequencyEntry {
            value: value.to_string(),
            count,
            percentage: if total_rows > 0 {
                (count as f64 / total_rows as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    Ok(FrequencyTable {
        column: name.to_string(),
        total_rows,
        entries,
    })
}
