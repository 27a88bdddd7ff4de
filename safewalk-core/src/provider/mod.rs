//! Fetch tagged map entities around a point.
//!
//! The [`MapProvider`] trait abstracts the map-data service. Callers hand
//! over a [`SpatialQuery`](crate::SpatialQuery) and receive the matching
//! [`Entity`](crate::Entity) values, or a [`ProviderError`] when the
//! request could not be completed. An empty result set is a success.
//!
//! [`RetryingProvider`] wraps any provider with a bounded retry policy
//! without changing the trait surface.

mod error;
mod retry;

pub use error::ProviderError;
pub use retry::{RetryPolicy, RetryingProvider};

use crate::{Entity, SpatialQuery};

/// Retrieve entities matching a spatial query.
///
/// Implementations perform one round trip per call and must distinguish
/// transport failures (returned as `Err`) from a query that simply
/// matched nothing (`Ok` with an empty vector).
///
/// # Examples
///
/// ```rust
/// use safewalk_core::{
///     Coordinate, Entity, MapProvider, ProviderError, QueryPredicate, SpatialQuery,
/// };
///
/// struct EmptyProvider;
///
/// impl MapProvider for EmptyProvider {
///     fn fetch_entities(&self, _query: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let centre = Coordinate::new(9.3, 76.6)?;
/// let query = SpatialQuery::single(centre, QueryPredicate::exists("shop", 1_500.0)?);
/// assert!(EmptyProvider.fetch_entities(&query)?.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait MapProvider {
    /// Return every entity satisfying at least one predicate of `query`.
    fn fetch_entities(&self, query: &SpatialQuery) -> Result<Vec<Entity>, ProviderError>;
}

impl<P: MapProvider + ?Sized> MapProvider for &P {
    fn fetch_entities(&self, query: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
        (**self).fetch_entities(query)
    }
}

impl<P: MapProvider + ?Sized> MapProvider for Box<P> {
    fn fetch_entities(&self, query: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
        (**self).fetch_entities(query)
    }
}
