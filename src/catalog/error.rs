use thiserror::Error;

/// Errors surfaced by catalog reads. Callers show these to the user; the
/// cart never sees them.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure, including timeouts.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Failed to fetch {what}: {status}")]
    Status {
        what: &'static str,
        status: reqwest::StatusCode,
    },

    /// The configured base URL cannot be extended into a request URL.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// The response body did not match the expected shape.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}
