//! Output formatting for different formats.

use clap::ValueEnum;
use dnssync_core::CheckReport;
use serde::{Deserialize, Serialize};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Monitoring plugin status line with performance data
    #[default]
    Nagios,
    /// JSON report
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nagios => write!(f, "nagios"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render a report for stdout.
pub fn render(report: &CheckReport, format: OutputFormat, verbosity: u8) -> String {
    match format {
        OutputFormat::Nagios => report.render(verbosity),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"status\":\"UNKNOWN\",\"summary\":\"{e}\"}}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::Nagios.to_string(), "nagios");
        assert_eq!(OutputFormat::from_str("json", true).unwrap(), OutputFormat::Json);
    }

    #[test]
    fn json_render_is_parseable() {
        let report = CheckReport::failed("No result. Domain probably does not exist");
        let text = render(&report, OutputFormat::Json, 0);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "UNKNOWN");
        assert_eq!(value["summary"], "No result. Domain probably does not exist");
        assert_eq!(value["metrics"].as_array().map(Vec::len), Some(0));
    }
}
