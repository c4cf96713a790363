//! Report output.
//!
//! [`text`] formats an [`AnalysisReport`] for the terminal. [`to_json`]
//! renders the same report as the document `--json` prints on stdout.
//!
//! # Example
//!
//! ```rust,ignore
//! use airq::reporting::{text, to_json};
//!
//! print!("{}", text::render_report(&report));
//! println!("{}", to_json(&report)?);
//! ```

pub mod text;

use crate::error::Result;
use crate::types::AnalysisReport;

/// Pretty-printed JSON of the report.
pub fn to_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
