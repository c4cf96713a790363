//! Plain-text rendering of the analysis tables.
//!
//! Every function returns a `String` so the binary decides where it goes.

use crate::types::{
    AnalysisReport, ColumnDescription, CorrelationMatrix, DatasetInfo, FrequencyTable,
    GroupAggregate, ImputationOutcome, NullRate,
};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// The complete text report, sections in pipeline order.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(&banner("AIR QUALITY ANALYSIS"));
    if let Some(ref path) = report.input_path {
        push_line(&mut out, format_args!("Input:   {}", path));
    }
    push_line(
        &mut out,
        format_args!("Shape:   {} rows x {} columns", report.shape.0, report.shape.1),
    );
    push_line(&mut out, format_args!("Elapsed: {}ms", report.duration_ms));
    out.push('\n');

    out.push_str(&section("MISSING VALUES PER COLUMN"));
    out.push_str(&null_rates_table(&report.null_rates));

    out.push_str(&section("COLUMN RENAMES"));
    out.push_str(&renames_list(&report.renames));

    out.push_str(&section("DATASET INFO"));
    out.push_str(&dataset_info_table(&report.info));

    out.push_str(&section("SUMMARY STATISTICS"));
    out.push_str(&describe_table(&report.description));

    out.push_str(&section("MEAN IMPUTATION"));
    out.push_str(&imputation_list(&report.imputation));

    out.push_str(&section("VALUE FREQUENCIES (% OF ROWS)"));
    for table in &report.frequencies {
        out.push_str(&frequency_table(table));
        out.push('\n');
    }

    out.push_str(&section("AVERAGE POLLUTION BY AREA CATEGORY"));
    out.push_str(&group_table(&report.area_aggregate));

    out.push_str(&section(&format!(
        "TOP {} STATES BY {}",
        report.top_states,
        report.state_sort_column.to_uppercase()
    )));
    out.push_str(&group_table(&report.top_states()));

    out.push_str(&section("CORRELATION BETWEEN POLLUTANTS"));
    out.push_str(&correlation_table(&report.correlation));

    if !report.warnings.is_empty() {
        out.push_str(&section("WARNINGS"));
        for warning in &report.warnings {
            push_line(&mut out, format_args!("  - {}", warning));
        }
    }

    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out
}

pub fn null_rates_table(rates: &[NullRate]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format_args!("{:<24} {:>10} {:>10}", "Column", "Missing", "Missing %"),
    );
    push_line(&mut out, format_args!("{}", "-".repeat(46)));
    for rate in rates {
        push_line(
            &mut out,
            format_args!(
                "{:<24} {:>10} {:>10.2}",
                truncate_str(&rate.column, 23),
                rate.missing_count,
                rate.missing_percentage
            ),
        );
    }
    out
}

pub fn renames_list(renames: &[String]) -> String {
    if renames.is_empty() {
        return "  No columns renamed\n".to_string();
    }
    let mut out = String::new();
    for rename in renames {
        push_line(&mut out, format_args!("  {}", rename));
    }
    out
}

pub fn dataset_info_table(info: &DatasetInfo) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format_args!("{} entries, {} columns", info.rows, info.columns.len()),
    );
    push_line(
        &mut out,
        format_args!("{:<4} {:<24} {:>14} {:<10}", "#", "Column", "Non-Null", "Dtype"),
    );
    push_line(&mut out, format_args!("{}", "-".repeat(56)));
    for (i, column) in info.columns.iter().enumerate() {
        push_line(
            &mut out,
            format_args!(
                "{:<4} {:<24} {:>14} {:<10}",
                i,
                truncate_str(&column.name, 23),
                column.non_null,
                column.dtype
            ),
        );
    }
    out
}

pub fn describe_table(descriptions: &[ColumnDescription]) -> String {
    let mut out = String::new();

    let numeric: Vec<&ColumnDescription> = descriptions.iter().filter(|d| d.is_numeric()).collect();
    if !numeric.is_empty() {
        push_line(
            &mut out,
            format_args!(
                "{:<18} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                "Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
            ),
        );
        push_line(&mut out, format_args!("{}", "-".repeat(106)));
        for description in numeric {
            if let ColumnDescription::Numeric {
                column,
                count,
                mean,
                std,
                min,
                q25,
                median,
                q75,
                max,
            } = description
            {
                push_line(
                    &mut out,
                    format_args!(
                        "{:<18} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                        truncate_str(column, 17),
                        count,
                        fmt_value(*mean),
                        fmt_value(*std),
                        fmt_value(*min),
                        fmt_value(*q25),
                        fmt_value(*median),
                        fmt_value(*q75),
                        fmt_value(*max)
                    ),
                );
            }
        }
        out.push('\n');
    }

    let text: Vec<&ColumnDescription> = descriptions.iter().filter(|d| !d.is_numeric()).collect();
    if !text.is_empty() {
        push_line(
            &mut out,
            format_args!(
                "{:<18} {:>8} {:>8} {:<30} {:>8}",
                "Column", "count", "unique", "top", "freq"
            ),
        );
        push_line(&mut out, format_args!("{}", "-".repeat(76)));
        for description in text {
            if let ColumnDescription::Text {
                column,
                count,
                unique,
                top,
                freq,
            } = description
            {
                push_line(
                    &mut out,
                    format_args!(
                        "{:<18} {:>8} {:>8} {:<30} {:>8}",
                        truncate_str(column, 17),
                        count,
                        unique,
                        truncate_str(top.as_deref().unwrap_or("-"), 29),
                        freq
                    ),
                );
            }
        }
    }
    out
}

/// One line per target column; filled columns read
/// "Filled missing values in 'X' with mean."
pub fn imputation_list(outcomes: &[ImputationOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        match outcome {
            ImputationOutcome::Filled {
                column,
                mean,
                filled,
            } => push_line(
                &mut out,
                format_args!(
                    "  Filled missing values in '{}' with mean. ({} cells, mean {:.2})",
                    column, filled, mean
                ),
            ),
            ImputationOutcome::Complete { column } => {
                push_line(&mut out, format_args!("  '{}' has no missing values", column))
            }
            ImputationOutcome::Undefined { column, missing } => push_line(
                &mut out,
                format_args!(
                    "  '{}' has no values to average; {} cells left missing",
                    column, missing
                ),
            ),
        }
    }
    out
}

pub fn frequency_table(table: &FrequencyTable) -> String {
    let mut out = String::new();
    push_line(&mut out, format_args!("{}:", table.column));
    for entry in &table.entries {
        push_line(
            &mut out,
            format_args!(
                "  {:<40} {:>9.4}",
                truncate_str(&entry.value, 39),
                entry.percentage
            ),
        );
    }
    if table.entries.is_empty() {
        out.push_str("  (no values)\n");
    }
    out
}

pub fn group_table(aggregate: &GroupAggregate) -> String {
    let mut out = String::new();

    let mut header = format!("{:<28}", aggregate.group_column);
    for column in &aggregate.value_columns {
        let _ = write!(header, " {:>17}", truncate_str(column, 17));
    }
    push_line(&mut out, format_args!("{}", header));
    push_line(
        &mut out,
        format_args!("{}", "-".repeat(28 + 18 * aggregate.value_columns.len())),
    );

    for row in &aggregate.rows {
        let mut line = format!("{:<28}", truncate_str(&row.key, 27));
        for mean in &row.means {
            let _ = write!(line, " {:>17}", fmt_value(*mean));
        }
        push_line(&mut out, format_args!("{}", line));
    }
    out
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();

    let mut header = format!("{:<18}", "");
    for label in &matrix.labels {
        let _ = write!(header, " {:>17}", truncate_str(label, 17));
    }
    push_line(&mut out, format_args!("{}", header));

    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        let mut line = format!("{:<18}", truncate_str(label, 17));
        for value in row {
            let _ = write!(line, " {:>17}", fmt_coefficient(*value));
        }
        push_line(&mut out, format_args!("{}", line));
    }
    out
}

fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title}\n{rule}\n")
}

fn section(title: &str) -> String {
    format!("\n{}\n{}\n", title, "-".repeat(40))
}

fn push_line(out: &mut String, args: std::fmt::Arguments<'_>) {
    // writing into a String cannot fail
    let _ = out.write_fmt(args);
    out.push('\n');
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) => format!("{:.4}", v),
        None => "NaN".to_string(),
    }
}

fn fmt_coefficient(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.3}", value)
    }
}

/// Truncate a string to max length (in characters) with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
