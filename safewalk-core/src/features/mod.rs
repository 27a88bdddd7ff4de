//! Turn provider results into the fixed-shape feature record.
//!
//! Two independent lookups feed a [`FeatureRecord`]:
//! - [`nearest_police`] finds the closest police station, and
//! - [`aggregate`] sweeps the surrounding area for lighting, shops,
//!   transit, hospitals, amenities and road classes.
//!
//! [`assemble`] merges their results and [`collect_features`] runs the
//! whole flow against one provider. Provider failures abort the flow;
//! an empty result set is never an error.

mod aggregate;
mod assemble;
mod nearest;
mod record;

use thiserror::Error;

use crate::{PredicateError, ProviderError, SpatialQueryError};

pub use aggregate::{aggregate, reduce_entities, sweep_query};
pub use assemble::{assemble, collect_features};
pub use nearest::{nearest_amenity, nearest_distance, nearest_police};
pub use record::{AreaFeatures, FeatureRecord, FeatureValue, RoadClass};

/// Radius of the general infrastructure sweep, in metres.
pub const SWEEP_RADIUS_METRES: f64 = 1_500.0;

/// Radius searched for the nearest police station, in metres.
pub const POLICE_RADIUS_METRES: f64 = 5_000.0;

/// Errors raised while computing features.
///
/// A zero count is indistinguishable from "could not check", so provider
/// failures are always surfaced rather than folded into the record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// The map provider could not be reached or refused the request.
    #[error("map provider unavailable: {source}")]
    ProviderUnavailable {
        #[source]
        source: ProviderError,
    },
    /// The map provider answered with a body that could not be decoded.
    #[error("map provider returned a malformed response: {source}")]
    MalformedResponse {
        #[source]
        source: ProviderError,
    },
    /// A lookup was requested with an invalid predicate.
    #[error("invalid lookup: {0}")]
    InvalidPredicate(#[from] PredicateError),
    /// A lookup was requested without predicates.
    #[error("invalid lookup: {0}")]
    InvalidQuery(#[from] SpatialQueryError),
}

impl From<ProviderError> for FeatureError {
    fn from(source: ProviderError) -> Self {
        match source {
            ProviderError::MalformedResponse { .. } => Self::MalformedResponse { source },
            _ => Self::ProviderUnavailable { source },
        }
    }
}
