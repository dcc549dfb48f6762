//! Serial collection from a zone's nameservers.
//!
//! Two [`SerialSource`] backends are provided:
//!
//! - [`DigSource`] shells out to `dig` and parses its text answers
//! - [`ResolverSource`] (feature `resolver`) queries nameservers natively
//!
//! [`collect`] drives either backend in authority-discovery or explicit-list
//! mode, querying explicit servers concurrently under per-query and overall
//! deadlines.
//!
//! # Example
//!
//! ```rust,ignore
//! use dnssync_probe::{collect, DigSource, ProbeOptions, QueryMode};
//!
//! let records = collect(
//!     &DigSource::default(),
//!     "example.org",
//!     &QueryMode::Authority,
//!     &ProbeOptions::default(),
//! )
//! .await?;
//! ```

pub mod dig;
#[cfg(feature = "resolver")]
pub mod resolver;
mod source;

pub use dig::DigSource;
#[cfg(feature = "resolver")]
pub use resolver::ResolverSource;
pub use source::{collect, ProbeOptions, QueryMode, SerialSource};
