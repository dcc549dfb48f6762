//! Monitoring-plugin output: status line, performance data and exit code.
//!
//! ```text
//! DNS_SYNC CRITICAL - 192.0.2.2 are behind | 192.0.2.1=0;;@1:;0 192.0.2.2=3;;@1:;0
//! 192.0.2.1: serial 2024010103, 0 version behind
//! 192.0.2.2: serial 2024010100, 3 version behind
//! ```

use serde::Serialize;
use std::fmt::Write as _;

use crate::classify::{classify, ClassificationResult, Thresholds};
use crate::summary::{format_summary, DisplayMode};
use crate::types::{DriftRecord, Metric, Status};

/// Name printed at the start of every status line
pub const CHECK_NAME: &str = "DNS_SYNC";

/// Everything a single run reports
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Overall status
    pub status: Status,

    /// One-line summary
    pub summary: String,

    /// One metric per measured server, empty when the probe failed
    pub metrics: Vec<Metric>,

    /// Ranked drift, empty when the probe failed
    pub drift: Vec<DriftRecord>,

    #[serde(skip)]
    thresholds: Thresholds,
}

impl CheckReport {
    /// Classify measured drift and build the report.
    #[must_use]
    pub fn measured(drift: Vec<DriftRecord>, thresholds: Thresholds, mode: DisplayMode) -> Self {
        let result = classify(&drift, &thresholds);
        Self::from_result(&result, drift, thresholds, mode)
    }

    /// Report for a probe that failed before anything was measured.
    #[must_use]
    pub fn failed(hint: impl Into<String>) -> Self {
        let result = ClassificationResult::unknown(hint);
        Self::from_result(&result, Vec::new(), Thresholds::default(), DisplayMode::default())
    }

    fn from_result(
        result: &ClassificationResult,
        drift: Vec<DriftRecord>,
        thresholds: Thresholds,
        mode: DisplayMode,
    ) -> Self {
        Self {
            status: result.status,
            summary: format_summary(result, mode),
            metrics: drift.iter().map(DriftRecord::metric).collect(),
            drift,
            thresholds,
        }
    }

    /// Process exit code for this report
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    /// First output line, with performance data when there are metrics
    #[must_use]
    pub fn status_line(&self) -> String {
        let mut line = format!("{CHECK_NAME} {} - {}", self.status, self.summary.trim_end());
        if !self.metrics.is_empty() {
            line.push_str(" |");
            for metric in &self.metrics {
                let _ = write!(line, " {}", self.perfdata(metric));
            }
        }
        line
    }

    /// Full plugin output; `verbosity` above zero adds one line per server
    #[must_use]
    pub fn render(&self, verbosity: u8) -> String {
        let mut out = self.status_line();
        if verbosity > 0 {
            for record in &self.drift {
                let _ = write!(
                    out,
                    "\n{}: serial {}, {}{}",
                    record.server,
                    record.serial,
                    record.lag,
                    crate::types::LAG_UOM
                );
            }
        }
        out
    }

    fn perfdata(&self, metric: &Metric) -> String {
        let range = |r: Option<crate::range::Range>| r.map(|r| r.to_string()).unwrap_or_default();
        format!(
            "{}={};{};{};{}",
            perf_label(&metric.name),
            metric.value,
            range(self.thresholds.warning),
            range(self.thresholds.critical),
            metric.min
        )
    }
}

/// Quote labels that contain separators.
fn perf_label(name: &str) -> String {
    if name.contains([' ', '=', '\'']) {
        format!("'{}'", name.replace('\'', "''"))
    } else {
        name.to_string()
    }
}
