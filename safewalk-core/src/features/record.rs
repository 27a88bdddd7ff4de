//! The feature record handed to the prediction model.

use crate::{NearestDistance, TimeContext};

/// Highest-priority road class seen around the query centre.
///
/// Ordering follows priority, so combining observations is a `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RoadClass {
    /// No classified road was observed.
    #[default]
    Unknown = 1,
    /// Tertiary or residential roads.
    Minor = 2,
    /// Primary or secondary roads.
    Major = 3,
}

impl RoadClass {
    /// Classify an OSM `highway=*` value.
    ///
    /// # Examples
    /// ```
    /// use safewalk_core::RoadClass;
    ///
    /// assert_eq!(RoadClass::from_highway("secondary"), RoadClass::Major);
    /// assert_eq!(RoadClass::from_highway("residential"), RoadClass::Minor);
    /// assert_eq!(RoadClass::from_highway("bus_stop"), RoadClass::Unknown);
    /// ```
    #[must_use]
    pub fn from_highway(value: &str) -> Self {
        match value {
            "primary" | "secondary" => Self::Major,
            "tertiary" | "residential" => Self::Minor,
            _ => Self::Unknown,
        }
    }

    /// Numeric score used by the model: 1, 2 or 3.
    #[must_use]
    pub const fn score(self) -> u8 {
        self as u8
    }

    /// Keep the higher-priority class; never downgrades.
    #[must_use]
    pub fn raise(self, observed: Self) -> Self {
        self.max(observed)
    }
}

/// Everything the area sweep produces, i.e. a record minus police distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaFeatures {
    pub(crate) time: TimeContext,
    pub(crate) street_lighting: u32,
    pub(crate) road_class: RoadClass,
    pub(crate) nearby_shops: u32,
    pub(crate) bus_stop_count: u32,
    pub(crate) poi_count: u32,
    pub(crate) hospital_distance: NearestDistance,
}

impl AreaFeatures {
    #[must_use]
    pub const fn time(&self) -> TimeContext {
        self.time
    }

    #[must_use]
    pub const fn street_lighting(&self) -> u32 {
        self.street_lighting
    }

    #[must_use]
    pub const fn road_class(&self) -> RoadClass {
        self.road_class
    }

    #[must_use]
    pub const fn nearby_shops(&self) -> u32 {
        self.nearby_shops
    }

    #[must_use]
    pub const fn bus_stop_count(&self) -> u32 {
        self.bus_stop_count
    }

    #[must_use]
    pub const fn poi_count(&self) -> u32 {
        self.poi_count
    }

    /// Shops per ten, derived from [`AreaFeatures::nearby_shops`].
    #[must_use]
    pub fn commercial_density(&self) -> f64 {
        f64::from(self.nearby_shops) / 10.0
    }

    #[must_use]
    pub const fn hospital_distance(&self) -> NearestDistance {
        self.hospital_distance
    }
}

/// A typed value in the flattened record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    /// Hours, counts and the road score.
    Integer(u32),
    /// Boolean flags.
    Flag(bool),
    /// Derived ratios.
    Real(f64),
    /// Distances that may be unavailable.
    Distance(NearestDistance),
}

/// Fixed-shape input for the prediction collaborator.
///
/// Built once per coordinate and time context and immutable afterwards.
/// The field order of [`FeatureRecord::FIELD_NAMES`], [`FeatureRecord::fields`]
/// and the serialised form is part of the contract with the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    area: AreaFeatures,
    police_distance: NearestDistance,
}

impl FeatureRecord {
    /// Field names in model order.
    pub const FIELD_NAMES: [&'static str; 11] = [
        "travel_hour",
        "is_night",
        "is_weekend",
        "street_lighting",
        "road_type_score",
        "nearby_shops",
        "bus_stop_count",
        "poi_count",
        "commercial_density",
        "hospital_distance",
        "police_distance",
    ];

    /// Merge the area sweep with the police lookup.
    #[must_use]
    pub const fn new(area: AreaFeatures, police_distance: NearestDistance) -> Self {
        Self {
            area,
            police_distance,
        }
    }

    #[must_use]
    pub const fn travel_hour(&self) -> u8 {
        self.area.time.travel_hour()
    }

    #[must_use]
    pub const fn is_night(&self) -> bool {
        self.area.time.is_night()
    }

    #[must_use]
    pub const fn is_weekend(&self) -> bool {
        self.area.time.is_weekend()
    }

    #[must_use]
    pub const fn street_lighting(&self) -> u32 {
        self.area.street_lighting
    }

    #[must_use]
    pub const fn road_type_score(&self) -> u8 {
        self.area.road_class.score()
    }

    #[must_use]
    pub const fn nearby_shops(&self) -> u32 {
        self.area.nearby_shops
    }

    #[must_use]
    pub const fn bus_stop_count(&self) -> u32 {
        self.area.bus_stop_count
    }

    #[must_use]
    pub const fn poi_count(&self) -> u32 {
        self.area.poi_count
    }

    #[must_use]
    pub fn commercial_density(&self) -> f64 {
        self.area.commercial_density()
    }

    #[must_use]
    pub const fn hospital_distance(&self) -> NearestDistance {
        self.area.hospital_distance
    }

    #[must_use]
    pub const fn police_distance(&self) -> NearestDistance {
        self.police_distance
    }

    /// Values in the same order as [`FeatureRecord::FIELD_NAMES`].
    #[must_use]
    pub fn values(&self) -> [FeatureValue; 11] {
        [
            FeatureValue::Integer(u32::from(self.travel_hour())),
            FeatureValue::Flag(self.is_night()),
            FeatureValue::Flag(self.is_weekend()),
            FeatureValue::Integer(self.street_lighting()),
            FeatureValue::Integer(u32::from(self.road_type_score())),
            FeatureValue::Integer(self.nearby_shops()),
            FeatureValue::Integer(self.bus_stop_count()),
            FeatureValue::Integer(self.poi_count()),
            FeatureValue::Real(self.commercial_density()),
            FeatureValue::Distance(self.hospital_distance()),
            FeatureValue::Distance(self.police_distance()),
        ]
    }

    /// Named values in model order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> {
        Self::FIELD_NAMES.into_iter().zip(self.values())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FeatureRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("FeatureRecord", Self::FIELD_NAMES.len())?;
        for (name, value) in self.fields() {
            match value {
                FeatureValue::Integer(number) => state.serialize_field(name, &number)?,
                FeatureValue::Flag(flag) => state.serialize_field(name, &flag)?,
                FeatureValue::Real(real) => state.serialize_field(name, &real)?,
                FeatureValue::Distance(metres) => state.serialize_field(name, &metres)?,
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn area() -> AreaFeatures {
        AreaFeatures {
            time: TimeContext::from_clock(21, true).expect("valid hour"),
            street_lighting: 2,
            road_class: RoadClass::Minor,
            nearby_shops: 3,
            bus_stop_count: 1,
            poi_count: 4,
            hospital_distance: NearestDistance::Metres(300.0),
        }
    }

    #[rstest]
    #[case(RoadClass::Unknown, RoadClass::Major, RoadClass::Major)]
    #[case(RoadClass::Major, RoadClass::Minor, RoadClass::Major)]
    #[case(RoadClass::Minor, RoadClass::Unknown, RoadClass::Minor)]
    fn raise_never_downgrades(
        #[case] current: RoadClass,
        #[case] observed: RoadClass,
        #[case] expected: RoadClass,
    ) {
        assert_eq!(current.raise(observed), expected);
    }

    #[rstest]
    fn density_is_derived_from_shops(area: AreaFeatures) {
        assert!((area.commercial_density() - 0.3).abs() < f64::EPSILON);
    }

    #[rstest]
    fn fields_follow_model_order(area: AreaFeatures) {
        let record = FeatureRecord::new(area, NearestDistance::Unavailable);
        let names: Vec<_> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names, FeatureRecord::FIELD_NAMES);
        assert_eq!(
            record.fields().last(),
            Some(("police_distance", FeatureValue::Distance(NearestDistance::Unavailable)))
        );
        assert_eq!(record.values()[4], FeatureValue::Integer(2));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_in_model_order(area: AreaFeatures) {
        let record = FeatureRecord::new(area, NearestDistance::Unavailable);
        let json = serde_json::to_string(&record).expect("serialise record");
        assert_eq!(
            json,
            concat!(
                r#"{"travel_hour":21,"is_night":true,"is_weekend":true,"#,
                r#""street_lighting":2,"road_type_score":2,"nearby_shops":3,"#,
                r#""bus_stop_count":1,"poi_count":4,"commercial_density":0.3,"#,
                r#""hospital_distance":300.0,"police_distance":"unavailable"}"#
            )
        );
    }
}
