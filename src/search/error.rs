//! Error types for index operations

/// Result type for index operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while talking to the search index
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No answer within the hard deadline
    #[error("Timeout after {0}ms")]
    IndexTimeout(u64),

    /// Connection refused, DNS failure, TLS failure, ...
    #[error("Index unreachable: {0}")]
    IndexUnavailable(String),

    /// Index answered with a non-success status
    #[error("Index returned status {status}: {body}")]
    IndexStatus { status: u16, body: String },

    /// Index answered with a body we could not parse
    #[error("Unexpected index response: {0}")]
    BadResponse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::BadResponse(err.to_string())
        } else {
            SearchError::IndexUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::BadResponse(err.to_string())
    }
}
