//! Area sweep: one multi-predicate query reduced in a single pass.

use log::debug;

use super::{AreaFeatures, FeatureError, RoadClass, SWEEP_RADIUS_METRES};
use crate::distance::MinimumDistance;
use crate::{
    Coordinate, ElementScope, Entity, MapProvider, QueryPredicate, SpatialQuery, TimeContext,
};

const ROAD_CLASSES: [&str; 4] = ["primary", "secondary", "tertiary", "residential"];

/// Build the sweep query: shops, street lamps, bus stops, classified roads
/// and hospitals within [`SWEEP_RADIUS_METRES`] of `centre`.
///
/// Shops and hospitals are often mapped as building outlines, so those
/// predicates cover ways as well as nodes.
pub fn sweep_query(centre: Coordinate) -> Result<SpatialQuery, FeatureError> {
    let radius = SWEEP_RADIUS_METRES;
    let predicates = vec![
        QueryPredicate::exists("shop", radius)?.with_scope(ElementScope::NodesAndWays),
        QueryPredicate::equals("highway", "street_lamp", radius)?
            .with_scope(ElementScope::Nodes),
        QueryPredicate::equals("highway", "bus_stop", radius)?.with_scope(ElementScope::Nodes),
        QueryPredicate::one_of("highway", ROAD_CLASSES, radius)?.with_scope(ElementScope::Ways),
        QueryPredicate::equals("amenity", "hospital", radius)?
            .with_scope(ElementScope::NodesAndWays),
    ];
    Ok(SpatialQuery::new(centre, predicates)?)
}

/// Sweep the area around `centre` and reduce it to [`AreaFeatures`].
///
/// Any provider failure aborts the sweep; a partially filled record is
/// never returned.
pub fn aggregate<P: MapProvider + ?Sized>(
    provider: &P,
    centre: Coordinate,
    time: TimeContext,
) -> Result<AreaFeatures, FeatureError> {
    let query = sweep_query(centre)?;
    let entities = provider.fetch_entities(&query)?;
    let features = reduce_entities(centre, time, &entities);
    debug!(
        "swept {} entities around {centre}: {} lamps, {} shops, {} bus stops, road class {:?}",
        entities.len(),
        features.street_lighting(),
        features.nearby_shops(),
        features.bus_stop_count(),
        features.road_class(),
    );
    Ok(features)
}

/// Classify and reduce `entities` in one linear pass.
///
/// Categories overlap: an entity can bump several counters. Entities
/// without a position are skipped entirely. `poi_count` increments once
/// per amenity-tagged entity, so hospitals count towards it as well.
///
/// # Examples
///
/// ```
/// use safewalk_core::{Coordinate, Entity, RoadClass, TimeContext, reduce_entities};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let centre = Coordinate::new(9.3157, 76.6151)?;
/// let time = TimeContext::from_clock(20, false)?;
/// let entities = [
///     Entity::way(1, centre).with_tag("highway", "residential"),
///     Entity::way(2, centre).with_tag("highway", "primary"),
///     Entity::node(3, centre).with_tag("shop", "bakery"),
/// ];
///
/// let features = reduce_entities(centre, time, &entities);
/// assert_eq!(features.road_class(), RoadClass::Major);
/// assert_eq!(features.nearby_shops(), 1);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn reduce_entities(centre: Coordinate, time: TimeContext, entities: &[Entity]) -> AreaFeatures {
    let mut tally = SweepTally::default();
    for entity in entities {
        tally.observe(centre, entity);
    }
    tally.finish(time)
}

#[derive(Debug, Default)]
struct SweepTally {
    street_lighting: u32,
    nearby_shops: u32,
    bus_stop_count: u32,
    poi_count: u32,
    road_class: RoadClass,
    hospital: MinimumDistance,
    skipped: usize,
}

impl SweepTally {
    fn observe(&mut self, centre: Coordinate, entity: &Entity) {
        let Some(position) = entity.position else {
            self.skipped += 1;
            return;
        };

        if entity.tag_is("highway", "street_lamp") {
            self.street_lighting += 1;
        }
        if entity.has_tag("shop") {
            self.nearby_shops += 1;
        }
        if entity.tag_is("highway", "bus_stop") {
            self.bus_stop_count += 1;
        }
        if entity.tag_is("amenity", "hospital") {
            self.hospital.observe(crate::distance(centre, position));
        }
        if entity.has_tag("amenity") {
            self.poi_count += 1;
        }
        if let Some(highway) = entity.tag("highway") {
            self.road_class = self.road_class.raise(RoadClass::from_highway(highway));
        }
    }

    fn finish(self, time: TimeContext) -> AreaFeatures {
        if self.skipped > 0 {
            debug!("skipped {} entities without a position", self.skipped);
        }
        AreaFeatures {
            time,
            street_lighting: self.street_lighting,
            road_class: self.road_class,
            nearby_shops: self.nearby_shops,
            bus_stop_count: self.bus_stop_count,
            poi_count: self.poi_count,
            hospital_distance: self.hospital.finish(),
        }
    }
}
