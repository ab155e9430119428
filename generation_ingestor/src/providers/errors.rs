use thiserror::Error;

/// Errors that can occur within a `GenerationProvider` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure: connection refused, DNS, TLS, or the request timed out.
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with something other than HTTP 200.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP 200, but the body is not `{ "data": [...] }`.
    #[error("Malformed API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::Request(e) => e.status().map(|s| s.as_u16()),
            ProviderError::Decode(_) => None,
        }
    }
}

/// Errors raised while constructing a provider.
#[derive(Debug, Error)]
pub enum ProviderInitError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid base URL `{url}`: {message}")]
    BaseUrl { url: String, message: String },

    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
}
