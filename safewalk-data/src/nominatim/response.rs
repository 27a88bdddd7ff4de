//! Nominatim search response types.

use safewalk_core::ProviderError;
use serde::Deserialize;

/// One entry of a `format=json` search reply.
///
/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub(super) struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl SearchResult {
    pub(super) fn parse_list(body: &[u8]) -> Result<Vec<Self>, ProviderError> {
        serde_json::from_slice(body).map_err(|err| ProviderError::MalformedResponse {
            message: format!("failed to parse Nominatim response: {err}"),
        })
    }

    /// Parse the latitude and longitude strings.
    pub(super) fn position(&self) -> Result<(f64, f64), ProviderError> {
        let parse = |field: &str, raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|err| ProviderError::MalformedResponse {
                    message: format!(
                        "unparseable {field} {raw:?} for {}: {err}",
                        self.display_name.as_deref().unwrap_or("unnamed result")
                    ),
                })
        };
        Ok((parse("lat", &self.lat)?, parse("lon", &self.lon)?))
    }
}
