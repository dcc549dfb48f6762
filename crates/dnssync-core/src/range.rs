//! Monitoring-plugin threshold ranges.
//!
//! Syntax is the usual `[@][start:][end]`: a bare `end` means `0:end`, an
//! omitted `end` is unbounded, `~` as `start` means negative infinity, and a
//! leading `@` alerts when the value falls *inside* the range instead of
//! outside it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;

/// A threshold range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: Option<i64>,
    end: Option<i64>,
    invert: bool,
}

impl Range {
    /// Range accepting everything from `start` upwards
    #[must_use]
    pub const fn from_floor(start: i64) -> Self {
        Self {
            start: Some(start),
            end: None,
            invert: false,
        }
    }

    /// Alert when the value is `start` or above
    #[must_use]
    pub const fn alert_at_or_above(start: i64) -> Self {
        Self {
            start: Some(start),
            end: None,
            invert: true,
        }
    }

    /// Returns true if `value` should raise an alert
    #[must_use]
    pub fn violates(&self, value: i64) -> bool {
        let inside =
            self.start.map_or(true, |s| value >= s) && self.end.map_or(true, |e| value <= e);
        if self.invert {
            inside
        } else {
            !inside
        }
    }
}

impl FromStr for Range {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SyncError::InvalidRange(s.to_string());
        let text = s.trim();
        let (invert, body) = text
            .strip_prefix('@')
            .map_or((false, text), |rest| (true, rest));
        if body.is_empty() {
            return Err(invalid());
        }

        let (start, end) = match body.split_once(':') {
            Some((start, end)) => {
                let start = match start {
                    "~" => None,
                    "" => Some(0),
                    n => Some(n.parse::<i64>().map_err(|_| invalid())?),
                };
                let end = if end.is_empty() {
                    None
                } else {
                    Some(end.parse::<i64>().map_err(|_| invalid())?)
                };
                (start, end)
            }
            None => (Some(0), Some(body.parse::<i64>().map_err(|_| invalid())?)),
        };

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(invalid());
            }
        }

        Ok(Self { start, end, invert })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            f.write_str("@")?;
        }
        match (self.start, self.end) {
            (Some(0), Some(end)) => write!(f, "{end}"),
            (start, end) => {
                match start {
                    Some(s) => write!(f, "{s}:")?,
                    None => f.write_str("~:")?,
                }
                if let Some(e) = end {
                    write!(f, "{e}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Range {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Range {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_critical_alerts_on_any_drift() {
        let range: Range = "@1:".parse().unwrap();
        assert_eq!(range, Range::alert_at_or_above(1));
        assert!(!range.violates(0));
        assert!(range.violates(1));
        assert!(range.violates(5000));
    }

    #[test]
    fn bare_end_means_zero_to_end() {
        let range: Range = "10".parse().unwrap();
        assert!(!range.violates(0));
        assert!(!range.violates(10));
        assert!(range.violates(11));
        assert!(range.violates(-1));
    }

    #[test]
    fn floor_and_negative_infinity() {
        let floor: Range = "5:".parse().unwrap();
        assert_eq!(floor, Range::from_floor(5));
        assert!(floor.violates(4));
        assert!(!floor.violates(5));

        let upto: Range = "~:3".parse().unwrap();
        assert!(!upto.violates(-100));
        assert!(upto.violates(4));
    }

    #[test]
    fn unbounded_range_never_alerts() {
        let range: Range = "~:".parse().unwrap();
        for value in [i64::MIN, -1, 0, 1, i64::from(u32::MAX)] {
            assert!(!range.violates(value));
        }
    }

    #[test]
    fn inverted_bounded_range() {
        let range: Range = "@2:4".parse().unwrap();
        assert!(!range.violates(1));
        assert!(range.violates(2));
        assert!(range.violates(4));
        assert!(!range.violates(5));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "@", "a:b", "5:2", "1:x", "1.5"] {
            assert!(bad.parse::<Range>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn display_is_canonical() {
        for text in ["@1:", "10", "~:3", "@2:4", "5:"] {
            assert_eq!(text.parse::<Range>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn serde_uses_text_form() {
        let range: Range = serde_json::from_str("\"@1:\"").unwrap();
        assert_eq!(range, Range::alert_at_or_above(1));
        assert_eq!(serde_json::to_string(&range).unwrap(), "\"@1:\"");
    }
}
