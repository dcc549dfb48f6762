//! Core types and logic for the DNS zone-serial sync check.
//!
//! Given the serials reported by a zone's nameservers, this crate decides how
//! far each server trails the most advanced one and how bad that is:
//!
//! - **Drift**: [`compute_drift`] ranks [`SerialRecord`]s and computes lag
//! - **Classification**: [`classify`] maps lag onto [`Status`] via [`Thresholds`]
//! - **Summary**: [`format_summary`] renders the one-line message
//! - **Plugin output**: [`CheckReport`] produces the status line and exit code
//!
//! # Example
//!
//! ```rust
//! use dnssync_core::{compute_drift, CheckReport, DisplayMode, SerialArithmetic, SerialRecord, Thresholds};
//!
//! let records = vec![
//!     SerialRecord::new("ns1.example.", 2024010101),
//!     SerialRecord::new("ns2.example.", 2024010100),
//! ];
//! let drift = compute_drift(&records, SerialArithmetic::Numeric).unwrap();
//! let report = CheckReport::measured(drift, Thresholds::default(), DisplayMode::Aggregate);
//! assert_eq!(report.summary, "ns2.example. are behind");
//! assert_eq!(report.exit_code(), 2);
//! ```

pub mod classify;
pub mod drift;
mod error;
pub mod plugin;
pub mod range;
pub mod summary;
pub mod types;

pub use classify::{classify, ClassificationResult, Thresholds};
pub use drift::{compute_drift, SerialArithmetic};
pub use error::{Result, SyncError};
pub use plugin::CheckReport;
pub use range::Range;
pub use summary::{format_summary, DisplayMode, IN_SYNC_MESSAGE};
pub use types::*;
