//! Nominatim geocoding adapter.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

mod response;

use log::debug;
use safewalk_core::{Coordinate, GeocodeError, Geocoder, ProviderError};
use url::Url;

use self::response::SearchResult;
use crate::http::{BlockingHttp, HttpClientConfig, ProviderBuildError};

/// Public Nominatim instance operated by the OpenStreetMap Foundation.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// A [`Geocoder`] backed by the Nominatim `/search` endpoint.
///
/// Only the best match is requested (`limit=1`). An empty result list is
/// reported as [`GeocodeError::NotFound`], never as a default coordinate.
#[derive(Debug)]
pub struct NominatimGeocoder {
    http: BlockingHttp,
    endpoint: Url,
}

impl NominatimGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or runtime
    /// cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpClientConfig::new(base_url))
    }

    /// Create a geocoder with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or runtime
    /// cannot be built.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = config.endpoint("search")?;
        let http = BlockingHttp::new(&config)?;
        Ok(Self { http, endpoint })
    }

    /// Build the search URL for `place`.
    #[must_use]
    pub fn search_url(&self, place: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", place)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }

    async fn search(&self, url: Url) -> Result<Vec<SearchResult>, ProviderError> {
        let request = self.http.client().get(url.clone());
        let bytes = self.http.send(request, &url).await?;
        SearchResult::parse_list(&bytes)
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        let url = self.search_url(place);
        debug!("geocoding {place:?} via {}", self.endpoint);
        let results = self.http.block_on(self.search(url))?;
        let Some(best) = results.into_iter().next() else {
            return Err(GeocodeError::NotFound {
                query: place.to_owned(),
            });
        };
        let (latitude, longitude) = best.position()?;
        let coordinate = Coordinate::new(latitude, longitude).map_err(|source| {
            GeocodeError::InvalidCoordinate {
                query: place.to_owned(),
                source,
            }
        })?;
        debug!("resolved {place:?} to {coordinate}");
        Ok(coordinate)
    }
}
