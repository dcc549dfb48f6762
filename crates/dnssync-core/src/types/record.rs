use serde::{Deserialize, Serialize};

/// Unit of measure appended to every lag value
pub const LAG_UOM: &str = " version behind";

/// Serial reported by one nameserver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialRecord {
    /// Server identity (hostname or address) as reported by the probe
    pub server: String,

    /// Zone serial from the SOA record
    pub serial: u32,
}

impl SerialRecord {
    /// Create a record
    #[must_use]
    pub fn new(server: impl Into<String>, serial: u32) -> Self {
        Self {
            server: server.into(),
            serial,
        }
    }
}

/// How far one server trails the most advanced serial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftRecord {
    /// Server identity
    pub server: String,

    /// Serial the server reported
    pub serial: u32,

    /// Versions behind the reference serial
    pub lag: u32,
}

impl DriftRecord {
    /// Returns true if the server holds the reference serial
    #[must_use]
    pub const fn is_current(&self) -> bool {
        self.lag == 0
    }

    /// Project the record into a metric for the plugin boundary
    #[must_use]
    pub fn metric(&self) -> Metric {
        Metric {
            name: self.server.clone(),
            value: self.lag,
            uom: LAG_UOM,
            min: 0,
        }
    }
}

/// A single measurement as reported to the monitoring system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    /// Metric name, the server identity
    pub name: String,

    /// Measured lag
    pub value: u32,

    /// Unit suffix
    pub uom: &'static str,

    /// Lowest possible value
    pub min: u32,
}
