//! Facade crate for the Safewalk feature engine.
//!
//! This crate re-exports the core domain types and, behind the `http`
//! feature, the Overpass and Nominatim adapters.

#![forbid(unsafe_code)]

pub use safewalk_core::{
    AreaFeatures, Coordinate, CoordinateError, EARTH_RADIUS_METRES, ElementKind, ElementScope,
    Entity, FeatureError, FeatureRecord, FeatureValue, GeocodeError, Geocoder, MapProvider,
    NearestDistance, POLICE_RADIUS_METRES, PredicateError, ProviderError, QueryPredicate,
    RetryPolicy, RetryingProvider, RoadClass, SWEEP_RADIUS_METRES, SpatialQuery,
    SpatialQueryError, TagFilter, Tags, TimeContext, TimeContextError, aggregate, assemble,
    collect_features, distance, nearest_amenity, nearest_police,
};

#[cfg(feature = "http")]
pub use safewalk_data::{
    HttpClientConfig, NominatimGeocoder, OverpassProvider, ProviderBuildError, render_query,
};
