//! Ranking of collected serials and per-server lag.
//!
//! The reference serial is the most advanced one observed. Servers reporting
//! the same serial keep the order in which they were collected, so repeated
//! runs over the same answers always rank them identically.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, SyncError};
use crate::types::{DriftRecord, SerialRecord};

/// Half of the serial space, the RFC 1982 comparison horizon
const SERIAL_HALF: u32 = 1 << 31;

/// How serials are compared against each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialArithmetic {
    /// Plain unsigned ordering; a serial that wrapped past 2^32 looks older
    #[default]
    Numeric,
    /// RFC 1982 sequence space arithmetic
    Rfc1982,
}

impl FromStr for SerialArithmetic {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" | "plain" => Ok(Self::Numeric),
            "rfc1982" => Ok(Self::Rfc1982),
            other => Err(format!(
                "unknown serial arithmetic '{other}' (expected numeric or rfc1982)"
            )),
        }
    }
}

/// Rank `records` by serial, most advanced first, and compute each lag.
///
/// Produces exactly one [`DriftRecord`] per input record.
///
/// # Errors
///
/// [`SyncError::NoRecords`] for empty input, [`SyncError::SerialSpread`] when
/// RFC 1982 comparison cannot pick a most advanced serial.
pub fn compute_drift(
    records: &[SerialRecord],
    arithmetic: SerialArithmetic,
) -> Result<Vec<DriftRecord>> {
    if records.is_empty() {
        return Err(SyncError::NoRecords);
    }

    let reference = match arithmetic {
        SerialArithmetic::Numeric => records
            .iter()
            .map(|r| r.serial)
            .max()
            .ok_or(SyncError::NoRecords)?,
        SerialArithmetic::Rfc1982 => rfc1982_reference(records)?,
    };
    debug!(reference, servers = records.len(), "reference serial selected");

    let mut drift: Vec<DriftRecord> = records
        .iter()
        .map(|r| DriftRecord {
            server: r.server.clone(),
            serial: r.serial,
            lag: reference.wrapping_sub(r.serial),
        })
        .collect();

    // Stable: equal lags keep collection order.
    drift.sort_by_key(|d| d.lag);

    Ok(drift)
}

/// The serial that every other serial is at most half the space behind.
fn rfc1982_reference(records: &[SerialRecord]) -> Result<u32> {
    records
        .iter()
        .map(|candidate| candidate.serial)
        .find(|&candidate| {
            records
                .iter()
                .all(|r| candidate.wrapping_sub(r.serial) < SERIAL_HALF)
        })
        .ok_or_else(|| SyncError::SerialSpread {
            low: records.iter().map(|r| r.serial).min().unwrap_or_default(),
            high: records.iter().map(|r| r.serial).max().unwrap_or_default(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(&str, u32)]) -> Vec<SerialRecord> {
        pairs
            .iter()
            .map(|(server, serial)| SerialRecord::new(*server, *serial))
            .collect()
    }

    #[test]
    fn reference_is_maximum_and_lags_non_negative() {
        let input = records(&[("ns2", 2024010100), ("ns1", 2024010105), ("ns3", 7)]);
        let drift = compute_drift(&input, SerialArithmetic::Numeric).unwrap();

        assert_eq!(drift.len(), input.len());
        assert_eq!(drift[0].server, "ns1");
        assert_eq!(drift[0].lag, 0);
        assert_eq!(drift[1].lag, 5);
        assert_eq!(drift[2].lag, 2024010105 - 7);
        for d in &drift {
            assert_eq!(d.lag, 2024010105 - d.serial);
        }
    }

    #[test]
    fn only_maximum_serials_are_current() {
        let input = records(&[("a", 10), ("b", 12), ("c", 12), ("d", 11)]);
        let drift = compute_drift(&input, SerialArithmetic::Numeric).unwrap();

        let current: Vec<&str> = drift
            .iter()
            .filter(|d| d.is_current())
            .map(|d| d.server.as_str())
            .collect();
        assert_eq!(current, ["b", "c"]);
    }

    #[test]
    fn ties_keep_collection_order() {
        let input = records(&[("ns9", 3), ("ns1", 3), ("ns5", 3)]);
        let drift = compute_drift(&input, SerialArithmetic::Numeric).unwrap();
        let order: Vec<&str> = drift.iter().map(|d| d.server.as_str()).collect();
        assert_eq!(order, ["ns9", "ns1", "ns5"]);

        let behind = records(&[("z", 1), ("y", 2), ("x", 1)]);
        let drift = compute_drift(&behind, SerialArithmetic::Numeric).unwrap();
        let order: Vec<&str> = drift.iter().map(|d| d.server.as_str()).collect();
        assert_eq!(order, ["y", "z", "x"]);
    }

    #[test]
    fn idempotent() {
        let input = records(&[("b", 5), ("a", 5), ("c", 1)]);
        let first = compute_drift(&input, SerialArithmetic::Numeric).unwrap();
        let second = compute_drift(&input, SerialArithmetic::Numeric).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn authority_scenario() {
        let input = records(&[("ns1.example.", 2024010101), ("ns2.example.", 2024010100)]);
        let drift = compute_drift(&input, SerialArithmetic::Numeric).unwrap();
        assert_eq!(drift[0].server, "ns1.example.");
        assert_eq!(drift[0].lag, 0);
        assert_eq!(drift[1].server, "ns2.example.");
        assert_eq!(drift[1].lag, 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            compute_drift(&[], SerialArithmetic::Numeric),
            Err(SyncError::NoRecords)
        ));
    }

    #[test]
    fn numeric_ignores_wraparound() {
        let input = records(&[("wrapped", 2), ("old", u32::MAX - 1)]);
        let drift = compute_drift(&input, SerialArithmetic::Numeric).unwrap();
        assert_eq!(drift[0].server, "old");
        assert_eq!(drift[1].lag, u32::MAX - 3);
    }

    #[test]
    fn rfc1982_handles_wraparound() {
        let input = records(&[("old", u32::MAX - 1), ("wrapped", 2)]);
        let drift = compute_drift(&input, SerialArithmetic::Rfc1982).unwrap();
        assert_eq!(drift[0].server, "wrapped");
        assert_eq!(drift[0].lag, 0);
        assert_eq!(drift[1].server, "old");
        assert_eq!(drift[1].lag, 4);
    }

    #[test]
    fn rfc1982_matches_numeric_without_wrap() {
        let input = records(&[("a", 100), ("b", 103), ("c", 103)]);
        assert_eq!(
            compute_drift(&input, SerialArithmetic::Rfc1982).unwrap(),
            compute_drift(&input, SerialArithmetic::Numeric).unwrap()
        );
    }

    #[test]
    fn rfc1982_rejects_half_space_spread() {
        let input = records(&[("a", 0), ("b", SERIAL_HALF)]);
        assert!(matches!(
            compute_drift(&input, SerialArithmetic::Rfc1982),
            Err(SyncError::SerialSpread { low: 0, high: SERIAL_HALF })
        ));
    }

    #[test]
    fn arithmetic_from_str() {
        assert_eq!("RFC1982".parse(), Ok(SerialArithmetic::Rfc1982));
        assert_eq!("numeric".parse(), Ok(SerialArithmetic::Numeric));
        assert!("modular".parse::<SerialArithmetic>().is_err());
    }
}
