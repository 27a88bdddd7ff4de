//! Great-circle distances and the "nearest match" sentinel.

use crate::Coordinate;

/// Radius of the spherical Earth used by [`distance`], in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Haversine distance between two coordinates in metres.
///
/// The result is symmetric and exactly `0.0` for identical inputs.
///
/// # Examples
///
/// ```
/// use safewalk_core::{Coordinate, distance};
///
/// # fn main() -> Result<(), safewalk_core::CoordinateError> {
/// let a = Coordinate::new(0.0, 0.0)?;
/// let b = Coordinate::new(0.0, 1.0)?;
/// assert!((distance(a, b) - 111_195.0).abs() < 50.0);
/// assert_eq!(distance(a, a), 0.0);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.latitude().to_radians();
    let phi_b = b.latitude().to_radians();
    let delta_phi = (b.latitude() - a.latitude()).to_radians();
    let delta_lambda = (b.longitude() - a.longitude()).to_radians();

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push antipodal inputs fractionally above one.
    let half_chord = half_chord.min(1.0);

    2.0 * EARTH_RADIUS_METRES * half_chord.sqrt().atan2((1.0 - half_chord).sqrt())
}

/// Distance to the closest matching entity, or an explicit "not found".
///
/// A co-located entity yields `Metres(0.0)`, which is distinct from
/// [`NearestDistance::Unavailable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NearestDistance {
    /// Distance to the closest match in metres.
    Metres(f64),
    /// No entity satisfying the predicate had a resolvable position.
    Unavailable,
}

impl NearestDistance {
    /// Distance in metres when one was observed.
    #[must_use]
    pub const fn metres(self) -> Option<f64> {
        match self {
            Self::Metres(metres) => Some(metres),
            Self::Unavailable => None,
        }
    }

    /// Whether a matching entity was observed.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Metres(_))
    }
}

impl From<Option<f64>> for NearestDistance {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::Metres)
    }
}

impl std::fmt::Display for NearestDistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Metres(metres) => write!(f, "{metres:.2} m"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NearestDistance {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Metres(metres) => serializer.serialize_f64(*metres),
            Self::Unavailable => serializer.serialize_str("unavailable"),
        }
    }
}

/// Running minimum over observed distances.
///
/// Starts in a "nothing seen" state rather than at infinity so that a
/// genuine zero-metre observation is never confused with a miss.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct MinimumDistance(Option<f64>);

impl MinimumDistance {
    pub(crate) fn observe(&mut self, metres: f64) {
        self.0 = Some(self.0.map_or(metres, |current| current.min(metres)));
    }

    pub(crate) fn finish(self) -> NearestDistance {
        self.0.into()
    }
}
