//! Resolve free-text place names to coordinates.

use thiserror::Error;

use crate::{Coordinate, CoordinateError, ProviderError};

/// Errors from [`Geocoder::geocode`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    /// The service knows no place matching the query.
    #[error("no location found for {query:?}")]
    NotFound { query: String },
    /// The service returned a position outside the valid WGS84 range.
    #[error("geocoder returned an invalid coordinate for {query:?}: {source}")]
    InvalidCoordinate {
        query: String,
        #[source]
        source: CoordinateError,
    },
    /// The geocoding service could not be consulted.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Turn a place name into a [`Coordinate`].
///
/// The feature engine treats the geocoder as an opaque coordinate
/// supplier; only the range of the returned value is checked.
///
/// # Examples
///
/// ```
/// use safewalk_core::{Coordinate, GeocodeError, Geocoder};
///
/// struct Fixed;
///
/// impl Geocoder for Fixed {
///     fn geocode(&self, place: &str) -> Result<Coordinate, GeocodeError> {
///         match place {
///             "Chengannur" => Ok(Coordinate::new(9.3157, 76.6151).expect("valid")),
///             other => Err(GeocodeError::NotFound { query: other.to_owned() }),
///         }
///     }
/// }
///
/// assert!(Fixed.geocode("Chengannur").is_ok());
/// assert!(matches!(Fixed.geocode("Atlantis"), Err(GeocodeError::NotFound { .. })));
/// ```
pub trait Geocoder {
    /// Resolve `place` to a coordinate.
    fn geocode(&self, place: &str) -> Result<Coordinate, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        (**self).geocode(place)
    }
}
