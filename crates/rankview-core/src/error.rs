use thiserror::Error;

/// Failure talking to the remote search service.
///
/// Kept free of any HTTP crate so that service implementations (and test
/// doubles) can all report through the same type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{endpoint} returned {code} {reason}")]
    Status { endpoint: String, code: u16, reason: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// User-visible failure of a search job. Every variant is terminal for the job
/// it belongs to; none of them is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Starting the job failed, so no job id exists.
    #[error("Failed to start search: {0}")]
    Submission(String),

    /// A progress or result request failed mid-flight.
    #[error("Error polling search progress: {0}")]
    Poll(String),

    /// The service itself reported `stage = error`.
    #[error("Search failed: {0}")]
    Job(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
