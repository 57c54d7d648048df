//! Huxley client error types.

/// Errors from the Huxley HTTP client (and the mock that stands in for it).
#[derive(Debug, thiserror::Error)]
pub enum DarwinError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Service details not found (expired or invalid ID)
    #[error("service not found (expired or invalid ID)")]
    ServiceNotFound,

    /// Rate limited by the API
    #[error("rate limited by Huxley")]
    RateLimited,

    /// Access token rejected
    #[error("unauthorized (invalid access token)")]
    Unauthorized,

    /// The configured base URL can't be used to build a request
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Mock board data couldn't be loaded
    #[error("mock data: {0}")]
    MockData(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl DarwinError {
    /// Whether a later retry could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DarwinError::Http(_) | DarwinError::RateLimited | DarwinError::ApiError { .. }
        )
    }
}
