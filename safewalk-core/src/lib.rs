//! Core domain types for the Safewalk feature engine.
//!
//! The crate turns a coordinate and a travel time into a fixed-shape
//! [`FeatureRecord`] by querying a [`MapProvider`] for nearby
//! infrastructure and reducing the returned entities. Transport adapters
//! live in `safewalk-data`; this crate only defines the seams and the
//! reductions.
//!
//! Constructors return `Result` to surface invalid input early.

pub mod coordinate;
pub mod distance;
pub mod entity;
pub mod features;
pub mod geocode;
pub mod provider;
pub mod query;
pub mod time;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use coordinate::{Coordinate, CoordinateError};
pub use distance::{EARTH_RADIUS_METRES, NearestDistance, distance};
pub use entity::{ElementKind, Entity, Tags};
pub use features::{
    AreaFeatures, FeatureError, FeatureRecord, FeatureValue, POLICE_RADIUS_METRES, RoadClass,
    SWEEP_RADIUS_METRES, aggregate, assemble, collect_features, nearest_amenity,
    nearest_distance, nearest_police, reduce_entities, sweep_query,
};
pub use geocode::{GeocodeError, Geocoder};
pub use provider::{MapProvider, ProviderError, RetryPolicy, RetryingProvider};
pub use query::{
    ElementScope, PredicateError, QueryPredicate, SpatialQuery, SpatialQueryError, TagFilter,
};
pub use time::{TimeContext, TimeContextError};
