//! Error types for the Jira integration.

/// Error from Jira API operations.
#[derive(Debug, thiserror::Error)]
pub enum JiraError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned an error status).
    #[error("HTTP error: {status} on {endpoint} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Endpoint the call targeted.
        endpoint: String,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
