//! Test-only map providers and fixture helpers used by unit and behaviour
//! tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::{Coordinate, EARTH_RADIUS_METRES, Entity, MapProvider, ProviderError, SpatialQuery};

/// In-memory `MapProvider` that filters a fixed entity set by the query.
///
/// The provider performs a linear scan and is intended only for small
/// datasets. Radius checks use [`crate::distance`], mirroring a remote
/// `around` filter.
#[derive(Default, Debug, Clone)]
pub struct MemoryMapProvider {
    entities: Vec<Entity>,
}

impl MemoryMapProvider {
    /// Create a provider from a collection of entities.
    pub fn with_entities<I>(entities: I) -> Self
    where
        I: IntoIterator<Item = Entity>,
    {
        Self {
            entities: entities.into_iter().collect(),
        }
    }
}

impl MapProvider for MemoryMapProvider {
    fn fetch_entities(&self, query: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
        Ok(self
            .entities
            .iter()
            .filter(|entity| query.matches(entity))
            .cloned()
            .collect())
    }
}

/// `MapProvider` replaying a scripted sequence of responses.
///
/// Each call pops the next response; once the script is exhausted every
/// further call returns an empty result set. The number of calls is
/// recorded for retry assertions.
#[derive(Debug, Default)]
pub struct ScriptedMapProvider {
    responses: RefCell<VecDeque<Result<Vec<Entity>, ProviderError>>>,
    calls: Cell<usize>,
}

impl ScriptedMapProvider {
    /// Create a provider replaying `responses` in order.
    pub fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<Vec<Entity>, ProviderError>>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            calls: Cell::new(0),
        }
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl MapProvider for ScriptedMapProvider {
    fn fetch_entities(&self, _query: &SpatialQuery) -> Result<Vec<Entity>, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Coordinate `metres` due north of `origin` along its meridian.
///
/// Distances computed back from `origin` match `metres` to well under a
/// millimetre.
///
/// # Panics
///
/// Panics when the offset would leave the valid latitude range.
pub fn offset_north(origin: Coordinate, metres: f64) -> Coordinate {
    let degrees = (metres / EARTH_RADIUS_METRES).to_degrees();
    Coordinate::new(origin.latitude() + degrees, origin.longitude())
        .unwrap_or_else(|err| panic!("offset of {metres} m from {origin} is invalid: {err}"))
}
