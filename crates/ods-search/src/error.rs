//! Error types for ODS search requests.

use thiserror::Error;

/// Errors that can occur while querying the search endpoint.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(#[from] ods_model::ModelError),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_render_code_and_body() {
        let err = SearchError::Status {
            status: 503,
            body: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn transport_errors_render_the_cause() {
        let err = SearchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
