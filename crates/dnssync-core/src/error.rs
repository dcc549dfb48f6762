use thiserror::Error;

/// Result type alias for sync check operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while probing nameservers or evaluating their serials
///
/// The display strings are scraped by operators from monitoring logs, so they
/// are kept stable.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A queried server did not answer in time
    #[error("{}", timeout_message(.server.as_deref()))]
    Timeout {
        /// Server that timed out, if the lookup was directed at one
        server: Option<String>,
    },

    /// The external query tool wrote to its error stream
    #[error("Dig returned an error: {0}")]
    Tool(String),

    /// No answer at all, the zone most likely does not exist
    #[error("No result. Domain probably does not exist")]
    EmptyAnswer,

    /// An answer line did not carry a usable SOA record
    #[error("No parsable SOA: {0}")]
    Parse(String),

    /// A resolver query failed for a reason other than timeout or NXDOMAIN
    #[error("{server} returned an error: {message}")]
    Query {
        /// Server the query was sent to
        server: String,
        /// Resolver error message
        message: String,
    },

    /// The tool binary could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Explicit-list mode without any server to ask
    #[error("No nameserver given to query")]
    NoNameservers,

    /// Drift computation on an empty set of serials
    #[error("No serial collected")]
    NoRecords,

    /// Serials spread too far apart to order with serial arithmetic
    #[error("Serials are too far apart to compare: {low} and {high}")]
    SerialSpread {
        /// Lowest serial observed
        low: u32,
        /// Highest serial observed
        high: u32,
    },

    /// Threshold range could not be parsed
    #[error("invalid range '{0}'")]
    InvalidRange(String),
}

fn timeout_message(server: Option<&str>) -> String {
    server.map_or_else(
        || String::from("A server timed out"),
        |s| format!("{s} timed out"),
    )
}

impl SyncError {
    /// Returns true if the error came from collecting serials rather than from
    /// the check's own configuration.
    #[must_use]
    pub const fn is_probe_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Tool(_)
                | Self::EmptyAnswer
                | Self::Parse(_)
                | Self::Query { .. }
                | Self::Spawn { .. }
        )
    }

    /// Shorthand for a timeout against a named server
    #[must_use]
    pub fn timeout_on(server: impl Into<String>) -> Self {
        Self::Timeout {
            server: Some(server.into()),
        }
    }
}
