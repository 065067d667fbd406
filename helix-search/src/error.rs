//! Error types for the helix-search crate.
//!
//! Provider failures are carried as values of [`SearchError`] and settled
//! into fallback records by the aggregator; only [`SearchError::EmptyQuery`]
//! and [`SearchError::Config`] ever reach a caller.

/// Errors that can occur while resolving a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query was missing or blank.
    #[error("query must not be empty")]
    EmptyQuery,

    /// An HTTP request to a provider failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider did not answer within the call budget.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A provider answered with a non-success status code.
    #[error("{provider} returned status {status}")]
    Status {
        /// Human-readable provider name.
        provider: String,
        /// The HTTP status code received.
        status: u16,
    },

    /// A provider payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Every source of a fan-out provider failed.
    #[error("all sources failed: {0}")]
    AllSourcesFailed(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Classify a [`reqwest::Error`] raised while talking to `provider`.
    pub(crate) fn from_reqwest(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{provider}: {err}"))
        } else if let Some(status) = err.status() {
            Self::Status {
                provider: provider.to_owned(),
                status: status.as_u16(),
            }
        } else {
            Self::Http(format!("{provider}: {err}"))
        }
    }
}

/// Convenience type alias for helix-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
