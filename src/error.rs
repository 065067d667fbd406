//! Error types for the helix service.

/// Top-level error type for the search service.
#[derive(Debug, thiserror::Error)]
pub enum HelixError {
    /// Configuration could not be read, parsed or written.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The aggregation layer rejected its configuration or input.
    #[error("search error: {0}")]
    Search(#[from] helix_search::SearchError),

    /// The HTTP server could not be started.
    #[error("server error: {0}")]
    Server(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, HelixError>;
