use thiserror::Error;

/// Errors from [`crate::provider::MapProvider::fetch_entities`] and the
/// HTTP geocoder.
///
/// Every variant except [`ProviderError::MalformedResponse`] means the
/// provider could not be consulted; callers must not treat them as "no
/// results".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },
    /// The connection could not be established or was interrupted.
    #[error("network error contacting {url}: {message}")]
    Network { url: String, message: String },
    /// The service answered with a non-success HTTP status.
    #[error("{url} responded with HTTP {status}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },
    /// The service answered successfully but reported a runtime failure.
    ///
    /// Overpass signals query timeouts and memory exhaustion this way,
    /// alongside a truncated element list.
    #[error("provider reported an error: {message}")]
    Service { message: String },
    /// The response body could not be decoded.
    #[error("malformed provider response: {message}")]
    MalformedResponse { message: String },
}

impl ProviderError {
    /// Whether repeating the request may succeed.
    ///
    /// Timeouts, connection failures, rate limiting, server errors and
    /// service-side runtime errors are transient; malformed bodies and
    /// client errors are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } | Self::Service { .. } => true,
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            Self::MalformedResponse { .. } => false,
        }
    }
}
