//! Merge the area sweep and the police lookup into one record.

use super::{AreaFeatures, FeatureError, aggregate, nearest_police};
use crate::{Coordinate, FeatureRecord, MapProvider, NearestDistance, TimeContext};

/// Combine independently computed parts into a [`FeatureRecord`].
///
/// Pure field assignment; the first failure is returned unchanged.
pub fn assemble(
    area: Result<AreaFeatures, FeatureError>,
    police_distance: Result<NearestDistance, FeatureError>,
) -> Result<FeatureRecord, FeatureError> {
    Ok(FeatureRecord::new(area?, police_distance?))
}

/// Run the police lookup and the area sweep, then assemble the record.
///
/// The two queries write to disjoint fields, so they are issued one after
/// the other on the caller's thread. Both must complete before assembly.
pub fn collect_features<P: MapProvider + ?Sized>(
    provider: &P,
    centre: Coordinate,
    time: TimeContext,
) -> Result<FeatureRecord, FeatureError> {
    let police_distance = nearest_police(provider, centre);
    let area = aggregate(provider, centre, time);
    assemble(area, police_distance)
}
