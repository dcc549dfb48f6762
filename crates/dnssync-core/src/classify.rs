//! Threshold evaluation of per-server lag.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::range::Range;
use crate::types::{DriftRecord, Status};

/// Warning and critical ranges applied to every server's lag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Range outside of which a server is WARNING
    #[serde(default)]
    pub warning: Option<Range>,

    /// Range outside of which a server is CRITICAL
    #[serde(default = "default_critical")]
    pub critical: Option<Range>,
}

#[allow(clippy::unnecessary_wraps)]
const fn default_critical() -> Option<Range> {
    Some(Range::alert_at_or_above(1))
}

impl Default for Thresholds {
    /// Any drift of one version or more is critical.
    fn default() -> Self {
        Self {
            warning: None,
            critical: default_critical(),
        }
    }
}

impl Thresholds {
    /// Status of a single lag value
    #[must_use]
    pub fn evaluate(&self, lag: u32) -> Status {
        let value = i64::from(lag);
        if self.critical.is_some_and(|r| r.violates(value)) {
            Status::Critical
        } else if self.warning.is_some_and(|r| r.violates(value)) {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}

/// Outcome of a check run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Most severe status observed
    pub status: Status,

    /// Records sharing the most severe status, in drift order
    pub significant: Vec<DriftRecord>,

    /// Failure description when the probe could not measure anything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ClassificationResult {
    /// Result for a probe that failed before measuring anything
    #[must_use]
    pub fn unknown(hint: impl Into<String>) -> Self {
        Self {
            status: Status::Unknown,
            significant: Vec::new(),
            hint: Some(hint.into()),
        }
    }
}

/// Classify measured drift against `thresholds`.
#[must_use]
pub fn classify(drift: &[DriftRecord], thresholds: &Thresholds) -> ClassificationResult {
    let evaluated: Vec<(Status, &DriftRecord)> = drift
        .iter()
        .map(|record| (thresholds.evaluate(record.lag), record))
        .collect();

    let status = evaluated
        .iter()
        .map(|(status, _)| *status)
        .max()
        .unwrap_or_default();

    let significant: Vec<DriftRecord> = evaluated
        .into_iter()
        .filter(|(s, _)| *s == status)
        .map(|(_, record)| record.clone())
        .collect();

    debug!(%status, significant = significant.len(), "classified drift");

    ClassificationResult {
        status,
        significant,
        hint: None,
    }
}
