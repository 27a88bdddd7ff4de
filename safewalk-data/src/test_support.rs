//! Test utilities for the transport adapters.
//!
//! [`StubGeocoder`] is a deterministic test double for [`Geocoder`] that
//! answers from a fixed table without making HTTP requests.

use std::collections::HashMap;

use safewalk_core::{Coordinate, GeocodeError, Geocoder};

/// Stub `Geocoder` for testing.
///
/// # Example
///
/// ```
/// use safewalk_core::{Coordinate, Geocoder};
/// use safewalk_data::test_support::StubGeocoder;
///
/// let centre = Coordinate::new(9.3157, 76.6151).expect("valid coordinate");
/// let geocoder = StubGeocoder::default().with_coordinate("Chengannur", centre);
///
/// assert_eq!(geocoder.geocode("Chengannur"), Ok(centre));
/// assert!(geocoder.geocode("Atlantis").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubGeocoder {
    places: HashMap<String, Coordinate>,
    error: Option<GeocodeError>,
}

impl StubGeocoder {
    /// Resolve `place` to `coordinate`.
    #[must_use]
    pub fn with_coordinate(mut self, place: impl Into<String>, coordinate: Coordinate) -> Self {
        self.places.insert(place.into(), coordinate);
        self
    }

    /// Fail every lookup with `error`.
    #[must_use]
    pub fn with_error(mut self, error: GeocodeError) -> Self {
        self.error = Some(error);
        self
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.places
            .get(place)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound {
                query: place.to_owned(),
            })
    }
}
