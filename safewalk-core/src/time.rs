//! Time-of-travel inputs for the feature record.
//!
//! Wall-clock parsing happens in callers; this module only validates the
//! hour and encodes the night-time window.

use thiserror::Error;

/// First hour (inclusive) treated as night.
pub const NIGHT_STARTS_AT: u8 = 19;

/// Last hour (inclusive) treated as night.
pub const NIGHT_ENDS_AT: u8 = 6;

/// Errors returned by [`TimeContext::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeContextError {
    /// The hour was not in `0..=23`.
    #[error("travel hour must be between 0 and 23, got {0}")]
    HourOutOfRange(u8),
}

/// When the journey takes place.
///
/// # Examples
///
/// ```
/// use safewalk_core::TimeContext;
///
/// let evening = TimeContext::from_clock(21, false)?;
/// assert!(evening.is_night());
/// assert!(!TimeContext::from_clock(12, true)?.is_night());
/// # Ok::<(), safewalk_core::TimeContextError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext {
    travel_hour: u8,
    is_night: bool,
    is_weekend: bool,
}

impl TimeContext {
    /// Validates and constructs a [`TimeContext`] from explicit flags.
    pub const fn new(
        travel_hour: u8,
        is_night: bool,
        is_weekend: bool,
    ) -> Result<Self, TimeContextError> {
        if travel_hour > 23 {
            return Err(TimeContextError::HourOutOfRange(travel_hour));
        }
        Ok(Self {
            travel_hour,
            is_night,
            is_weekend,
        })
    }

    /// Build a context deriving `is_night` from the hour.
    pub const fn from_clock(travel_hour: u8, is_weekend: bool) -> Result<Self, TimeContextError> {
        Self::new(travel_hour, is_night_hour(travel_hour), is_weekend)
    }

    #[must_use]
    pub const fn travel_hour(self) -> u8 {
        self.travel_hour
    }

    #[must_use]
    pub const fn is_night(self) -> bool {
        self.is_night
    }

    #[must_use]
    pub const fn is_weekend(self) -> bool {
        self.is_weekend
    }
}

/// Whether `hour` falls in the night window (19:00 to 06:59).
#[must_use]
pub const fn is_night_hour(hour: u8) -> bool {
    hour >= NIGHT_STARTS_AT || hour <= NIGHT_ENDS_AT
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, true)]
    #[case(6, true)]
    #[case(7, false)]
    #[case(18, false)]
    #[case(19, true)]
    #[case(23, true)]
    fn night_window_is_inclusive(#[case] hour: u8, #[case] expected: bool) {
        assert_eq!(is_night_hour(hour), expected);
    }

    #[rstest]
    fn rejects_hour_past_midnight() {
        assert_eq!(
            TimeContext::new(24, false, false),
            Err(TimeContextError::HourOutOfRange(24))
        );
    }
}
