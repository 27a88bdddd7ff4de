//! HTTP-backed [`MapProvider`] for an Overpass interpreter.

use log::debug;
use safewalk_core::{Entity, MapProvider, ProviderError, SpatialQuery};
use url::Url;

use super::query::render_query;
use super::response::OverpassResponse;
use crate::http::{BlockingHttp, HttpClientConfig, ProviderBuildError};

/// Public Overpass instance operated by FOSSGIS.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de";

/// Headroom between the server-side query timeout and the client timeout.
const SERVER_TIMEOUT_MARGIN_SECS: u64 = 5;

/// A [`MapProvider`] that posts Overpass QL to `{base_url}/api/interpreter`.
///
/// Each call renders the query, sends it as the raw request body and
/// decodes the JSON reply. The server is asked to abort slightly before the
/// client gives up so that a slow query surfaces as a remark rather than a
/// dropped connection where possible.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use safewalk_core::{Coordinate, MapProvider, sweep_query};
/// use safewalk_data::{HttpClientConfig, OverpassProvider};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HttpClientConfig::new("https://overpass-api.de")
///     .with_timeout(Duration::from_secs(30));
/// let provider = OverpassProvider::with_config(config)?;
///
/// let centre = Coordinate::new(9.3157, 76.6151)?;
/// let entities = provider.fetch_entities(&sweep_query(centre)?)?;
/// println!("{} entities", entities.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OverpassProvider {
    http: BlockingHttp,
    endpoint: Url,
    server_timeout_secs: u64,
}

impl OverpassProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or runtime
    /// cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpClientConfig::new(base_url))
    }

    /// Create a provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or runtime
    /// cannot be built.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = config.endpoint("api/interpreter")?;
        let server_timeout_secs = config
            .timeout
            .as_secs()
            .saturating_sub(SERVER_TIMEOUT_MARGIN_SECS)
            .max(1);
        let http = BlockingHttp::new(&config)?;
        Ok(Self {
            http,
            endpoint,
            server_timeout_secs,
        })
    }

    /// The interpreter URL requests are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The `[timeout:N]` value written into every query.
    #[must_use]
    pub const fn server_timeout_secs(&self) -> u64 {
        self.server_timeout_secs
    }

    async fn fetch_async(&self, body: String) -> Result<Vec<Entity>, ProviderError> {
        let request = self.http.client().post(self.endpoint.clone()).body(body);
        let bytes = self.http.send(request, &self.endpoint).await?;
        OverpassResponse::from_slice(&bytes)?.into_entities()
    }
}

impl MapProvider for OverpassProvider {
    fn fetch_entities(&self, query: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
        let body = render_query(query, self.server_timeout_secs);
        debug!(
            "querying {} for {} predicates around {}",
            self.endpoint,
            query.predicates().len(),
            query.centre()
        );
        let entities = self.http.block_on(self.fetch_async(body))?;
        debug!("{} returned {} entities", self.endpoint, entities.len());
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(30, 25)]
    #[case(6, 1)]
    #[case(2, 1)]
    fn server_timeout_leaves_headroom(#[case] client_secs: u64, #[case] expected: u64) {
        let config = HttpClientConfig::new("http://localhost:12345")
            .with_timeout(Duration::from_secs(client_secs));
        let provider = OverpassProvider::with_config(config).expect("provider builds");
        assert_eq!(provider.server_timeout_secs(), expected);
    }

    #[rstest]
    fn targets_the_interpreter_endpoint() {
        let provider = OverpassProvider::new("http://localhost:12345/").expect("provider builds");
        assert_eq!(
            provider.endpoint().as_str(),
            "http://localhost:12345/api/interpreter"
        );
    }

    #[rstest]
    fn rejects_invalid_base_url() {
        let err = OverpassProvider::new("overpass").expect_err("relative URL");
        assert!(matches!(err, ProviderBuildError::InvalidUrl { .. }));
    }
}
