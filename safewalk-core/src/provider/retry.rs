//! Bounded retry with exponential backoff around a [`MapProvider`].

use std::time::Duration;

use log::warn;

use super::{MapProvider, ProviderError};
use crate::{Entity, SpatialQuery};

/// Default number of attempts, including the first one.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Default growth factor between successive delays.
const DEFAULT_MULTIPLIER: u32 = 2;

/// How often and how patiently to repeat a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; values below one act as one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Factor applied to the delay after each retry.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            multiplier: 1,
        }
    }

    /// Set the total number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay before the first retry.
    #[must_use]
    pub const fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Delay to wait after the given failed attempt (1-based).
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        self.initial_backoff
            .saturating_mul(self.multiplier.saturating_pow(exponent))
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// A [`MapProvider`] that repeats transient failures of an inner provider.
///
/// Only errors for which [`ProviderError::is_transient`] holds are
/// retried. The final error is returned unchanged once the attempts are
/// exhausted.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use safewalk_core::{MapProvider, RetryPolicy, RetryingProvider};
/// # use safewalk_core::{Entity, ProviderError, SpatialQuery};
/// # struct Overpass;
/// # impl MapProvider for Overpass {
/// #     fn fetch_entities(&self, _q: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
/// #         Ok(Vec::new())
/// #     }
/// # }
///
/// let policy = RetryPolicy::default().with_initial_backoff(Duration::from_millis(250));
/// let provider = RetryingProvider::new(Overpass, policy);
/// assert_eq!(provider.policy().max_attempts, 3);
/// ```
#[derive(Debug, Clone)]
pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P> RetryingProvider<P> {
    /// Wrap `inner` with `policy`.
    pub const fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped provider.
    pub const fn inner(&self) -> &P {
        &self.inner
    }

    /// The active retry policy.
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<P: MapProvider> MapProvider for RetryingProvider<P> {
    fn fetch_entities(&self, query: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
        let attempts = self.policy.attempts();
        let mut attempt = 1;
        loop {
            match self.inner.fetch_entities(query) {
                Err(err) if err.is_transient() && attempt < attempts => {
                    let delay = self.policy.backoff_after(attempt);
                    warn!(
                        "map provider attempt {attempt}/{attempts} failed: {err}; retrying in {delay:?}"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedMapProvider;
    use crate::{Coordinate, QueryPredicate};
    use rstest::{fixture, rstest};

    #[fixture]
    fn query() -> SpatialQuery {
        let centre = Coordinate::new(9.3157, 76.6151).expect("valid coordinate");
        let predicate = QueryPredicate::equals("amenity", "police", 5_000.0).expect("predicate");
        SpatialQuery::single(centre, predicate)
    }

    fn timeout() -> ProviderError {
        ProviderError::Timeout {
            url: "http://example.com/api/interpreter".to_owned(),
            timeout_secs: 30,
        }
    }

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(max_attempts)
            .with_initial_backoff(Duration::ZERO)
    }

    #[rstest]
    fn recovers_after_transient_failures(query: SpatialQuery) {
        let scripted = ScriptedMapProvider::new([Err(timeout()), Err(timeout()), Ok(Vec::new())]);
        let provider = RetryingProvider::new(&scripted, instant_policy(3));

        let entities = provider
            .fetch_entities(&query)
            .expect("third attempt should succeed");

        assert!(entities.is_empty());
        assert_eq!(scripted.calls(), 3);
    }

    #[rstest]
    fn gives_up_after_max_attempts(query: SpatialQuery) {
        let scripted = ScriptedMapProvider::new([Err(timeout()), Err(timeout()), Err(timeout())]);
        let provider = RetryingProvider::new(&scripted, instant_policy(2));

        let err = provider
            .fetch_entities(&query)
            .expect_err("attempts should be exhausted");

        assert_eq!(err, timeout());
        assert_eq!(scripted.calls(), 2);
    }

    #[rstest]
    fn does_not_retry_malformed_responses(query: SpatialQuery) {
        let malformed = ProviderError::MalformedResponse {
            message: "expected value at line 1 column 1".to_owned(),
        };
        let scripted = ScriptedMapProvider::new([Err(malformed.clone()), Ok(Vec::new())]);
        let provider = RetryingProvider::new(&scripted, instant_policy(3));

        let err = provider
            .fetch_entities(&query)
            .expect_err("malformed response is permanent");

        assert_eq!(err, malformed);
        assert_eq!(scripted.calls(), 1);
    }

    #[rstest]
    #[case(1, Duration::from_millis(500))]
    #[case(2, Duration::from_secs(1))]
    #[case(3, Duration::from_secs(2))]
    fn backoff_grows_exponentially(#[case] attempt: u32, #[case] expected: Duration) {
        assert_eq!(RetryPolicy::default().backoff_after(attempt), expected);
    }

    #[rstest]
    fn zero_attempts_still_tries_once(query: SpatialQuery) {
        let scripted = ScriptedMapProvider::new([Err(timeout())]);
        let provider = RetryingProvider::new(&scripted, instant_policy(0));

        assert!(provider.fetch_entities(&query).is_err());
        assert_eq!(scripted.calls(), 1);
    }
}
