//! Nearest-amenity lookup.

use log::debug;

use super::{FeatureError, POLICE_RADIUS_METRES};
use crate::distance::MinimumDistance;
use crate::{Coordinate, Entity, MapProvider, NearestDistance, QueryPredicate, SpatialQuery};

/// Distance from `centre` to the closest `key=value` entity within
/// `radius_metres`.
///
/// Issues one single-predicate query. Returns
/// [`NearestDistance::Unavailable`] when nothing with a position matched;
/// provider failures are returned as errors and never retried here.
///
/// # Examples
///
/// ```
/// use safewalk_core::{Coordinate, NearestDistance, nearest_amenity};
/// # use safewalk_core::{Entity, MapProvider, ProviderError, SpatialQuery};
/// # struct Nothing;
/// # impl MapProvider for Nothing {
/// #     fn fetch_entities(&self, _q: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
/// #         Ok(Vec::new())
/// #     }
/// # }
///
/// let centre = Coordinate::new(9.3157, 76.6151)?;
/// let police = nearest_amenity(&Nothing, centre, "amenity", "police", 5_000.0)?;
/// assert_eq!(police, NearestDistance::Unavailable);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn nearest_amenity<P: MapProvider + ?Sized>(
    provider: &P,
    centre: Coordinate,
    key: &str,
    value: &str,
    radius_metres: f64,
) -> Result<NearestDistance, FeatureError> {
    let predicate = QueryPredicate::equals(key, value, radius_metres)?;
    let query = SpatialQuery::single(centre, predicate);
    let entities = provider.fetch_entities(&query)?;
    let nearest = nearest_distance(centre, &entities);
    debug!(
        "nearest {key}={value} within {radius_metres} m of {centre}: {nearest} ({} candidates)",
        entities.len()
    );
    Ok(nearest)
}

/// Distance to the closest police station within [`POLICE_RADIUS_METRES`].
pub fn nearest_police<P: MapProvider + ?Sized>(
    provider: &P,
    centre: Coordinate,
) -> Result<NearestDistance, FeatureError> {
    nearest_amenity(provider, centre, "amenity", "police", POLICE_RADIUS_METRES)
}

/// Minimum distance from `centre` over entities that have a position.
#[must_use]
pub fn nearest_distance(centre: Coordinate, entities: &[Entity]) -> NearestDistance {
    let mut nearest = MinimumDistance::default();
    for position in entities.iter().filter_map(|entity| entity.position) {
        nearest.observe(crate::distance(centre, position));
    }
    nearest.finish()
}
