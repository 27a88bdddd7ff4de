//! Shared blocking HTTP plumbing for the Overpass and Nominatim adapters.
//!
//! The core traits are synchronous to keep the feature engine embeddable
//! in synchronous contexts. [`BlockingHttp`] bridges async `reqwest` calls
//! onto them by blocking on a Tokio runtime it owns.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use safewalk_core::ProviderError;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

/// Default user agent for outbound requests.
///
/// Both OpenStreetMap services reject anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "safewalk-engine/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for provider construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The configured base URL could not be parsed.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        /// Rejected URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Connection settings shared by the HTTP adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Base URL of the service (e.g., `"https://overpass-api.de"`).
    pub base_url: String,
    /// Per-request timeout, covering connect and body transfer.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Create a configuration for `base_url` with default timeout and agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Join `path` onto the base URL, tolerating a trailing slash.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ProviderBuildError> {
        let joined = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|source| ProviderBuildError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })
    }
}

/// A `reqwest` client paired with the runtime used to drive it.
///
/// When called from outside any Tokio runtime, requests run on the owned
/// current-thread runtime. Inside a multi-threaded runtime the caller's
/// handle is used with [`tokio::task::block_in_place`] to avoid nested
/// runtime panics. Inside a `current_thread` runtime the owned runtime is
/// used instead, which may deadlock if the caller's runtime drives IO the
/// request depends on.
pub(crate) struct BlockingHttp {
    client: Client,
    runtime: Runtime,
    timeout: Duration,
}

impl std::fmt::Debug for BlockingHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingHttp")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BlockingHttp {
    pub(crate) fn new(config: &HttpClientConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            timeout: config.timeout,
        })
    }

    pub(crate) const fn client(&self) -> &Client {
        &self.client
    }

    /// Drive `future` to completion on an appropriate runtime.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own runtime.
            _ => self.runtime.block_on(future),
        }
    }

    /// Send a prepared request and read the full body.
    ///
    /// Non-success statuses, timeouts and connection failures all map to
    /// [`ProviderError`] variants distinct from an empty body.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<Vec<u8>, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        Ok(body.to_vec())
    }

    /// Convert a reqwest error to a `ProviderError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProviderError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        ProviderError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpClientConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    #[case("http://overpass.example.com")]
    #[case("http://overpass.example.com/")]
    fn endpoint_strips_trailing_slash(#[case] base: &str) {
        let url = HttpClientConfig::new(base)
            .endpoint("api/interpreter")
            .expect("valid base URL");
        assert_eq!(url.as_str(), "http://overpass.example.com/api/interpreter");
    }

    #[rstest]
    fn endpoint_rejects_unparseable_base() {
        let err = HttpClientConfig::new("not a url")
            .endpoint("search")
            .expect_err("base URL must be absolute");
        assert!(matches!(err, ProviderBuildError::InvalidUrl { .. }));
    }

    #[rstest]
    fn invalid_url_reports_the_url_and_parser_source() {
        use std::error::Error as _;

        let err = HttpClientConfig::new("not a url")
            .endpoint("search")
            .expect_err("base URL must be absolute");

        assert!(
            err.to_string().starts_with("invalid base URL \"not a url\": "),
            "got {err}"
        );
        let source = err.source().expect("parser error is chained");
        assert!(source.downcast_ref::<url::ParseError>().is_some());
    }
}
