//! Report export for snapkeep
//!
//! Renders run, prune and listing results for scripts and schedulers:
//! - JSON: machine-readable, one document per invocation
//! - YAML: human-readable with a short header comment

pub mod json;
pub mod yaml;

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::SnapResult;

pub use json::write_json_report;
pub use yaml::write_yaml_report;

/// Output format of CLI reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Plain text for terminals
    #[default]
    Text,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

/// Write a report in a structured format
///
/// Returns `Ok(false)` for [`ReportFormat::Text`], which callers render
/// themselves.
pub fn write_report<T, W>(report: &T, format: ReportFormat, writer: &mut W) -> SnapResult<bool>
where
    T: Serialize,
    W: Write,
{
    match format {
        ReportFormat::Text => Ok(false),
        ReportFormat::Json => write_json_report(report, writer).map(|_| true),
        ReportFormat::Yaml => write_yaml_report(report, writer).map(|_| true),
    }
}
