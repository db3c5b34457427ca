//! Status probe error type for retry classification.

use thiserror::Error;

/// Error from a single status probe (transport failure, HTTP error, or a
/// body that could not be parsed). Classified into a retry decision before
/// anything reaches the engine's callers.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Response body was not valid JSON of the expected shape
    /// (e.g. a truncated response).
    #[error("malformed status body: {0}")]
    Body(#[source] serde_json::Error),
}
