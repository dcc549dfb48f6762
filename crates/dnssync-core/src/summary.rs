//! One-line summaries of a classification.

use serde::{Deserialize, Serialize};

use crate::classify::ClassificationResult;
use crate::types::{Status, LAG_UOM};

/// Message when every server holds the reference serial
pub const IN_SYNC_MESSAGE: &str = "All zones are in sync";

/// Suffix of the aggregate message
const BEHIND_SUFFIX: &str = " are behind";

/// How degraded results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// `ns1,ns2 are behind`
    #[default]
    Aggregate,
    /// `ns1 3 version behind ns2 1 version behind `
    Metric,
}

/// Render `result` as a single line.
#[must_use]
pub fn format_summary(result: &ClassificationResult, mode: DisplayMode) -> String {
    match result.status {
        Status::Ok => IN_SYNC_MESSAGE.to_string(),
        Status::Unknown => result.hint.clone().unwrap_or_default(),
        Status::Warning | Status::Critical => match mode {
            DisplayMode::Metric => result
                .significant
                .iter()
                .map(|d| format!("{} {}{LAG_UOM} ", d.server, d.lag))
                .collect(),
            DisplayMode::Aggregate => {
                let mut servers: Vec<&str> =
                    result.significant.iter().map(|d| d.server.as_str()).collect();
                servers.sort_unstable();
                format!("{}{BEHIND_SUFFIX}", servers.join(","))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DriftRecord;

    fn degraded(pairs: &[(&str, u32)]) -> ClassificationResult {
        ClassificationResult {
            status: Status::Critical,
            significant: pairs
                .iter()
                .map(|(server, lag)| DriftRecord {
                    server: (*server).to_string(),
                    serial: 1000 - lag,
                    lag: *lag,
                })
                .collect(),
            hint: None,
        }
    }

    /// Inverse of the metric rendering, for round-trip checks.
    fn parse_metric_line(line: &str) -> Vec<(String, u32)> {
        line.split_terminator(&format!("{LAG_UOM} "))
            .map(|entry| {
                let (server, lag) = entry.rsplit_once(' ').unwrap();
                (server.to_string(), lag.parse().unwrap())
            })
            .collect()
    }

    #[test]
    fn ok_message_is_fixed() {
        let result = ClassificationResult {
            status: Status::Ok,
            significant: Vec::new(),
            hint: None,
        };
        assert_eq!(format_summary(&result, DisplayMode::Metric), "All zones are in sync");
        assert_eq!(format_summary(&result, DisplayMode::Aggregate), "All zones are in sync");
    }

    #[test]
    fn unknown_surfaces_hint() {
        let result = ClassificationResult::unknown("Dig returned an error: boom");
        assert_eq!(
            format_summary(&result, DisplayMode::Aggregate),
            "Dig returned an error: boom"
        );
    }

    #[test]
    fn aggregate_names_are_sorted() {
        let result = degraded(&[("ns2", 1), ("ns1", 1)]);
        assert_eq!(format_summary(&result, DisplayMode::Aggregate), "ns1,ns2 are behind");
    }

    #[test]
    fn metric_mode_shows_lag() {
        let result = degraded(&[("192.0.2.53", 5)]);
        let line = format_summary(&result, DisplayMode::Metric);
        assert_eq!(line, "192.0.2.53 5 version behind ");
        assert!(line.contains("192.0.2.53 5 version behind"));
    }

    #[test]
    fn metric_mode_round_trips_in_order() {
        let result = degraded(&[("ns3.example.", 7), ("ns1.example.", 2), ("ns2.example.", 2)]);
        let parsed = parse_metric_line(&format_summary(&result, DisplayMode::Metric));
        let expected: Vec<(String, u32)> = result
            .significant
            .iter()
            .map(|d| (d.server.clone(), d.lag))
            .collect();
        assert_eq!(parsed, expected);
    }
}
