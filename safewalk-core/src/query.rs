//! Provider-neutral spatial queries.
//!
//! A [`SpatialQuery`] is a centre plus an ordered list of
//! [`QueryPredicate`]s. Each predicate carries its own radius and the
//! predicates are combined with logical OR: an entity appears in the
//! result set when it satisfies any one of them. Providers translate the
//! query into their own wire format (see `safewalk-data` for Overpass QL)
//! and must return a representative centre point for area-shaped
//! entities.
//!
//! Queries are plain values built per call; nothing is shared between
//! successive requests.

use thiserror::Error;

use crate::{Coordinate, ElementKind, Entity, distance};

/// How a predicate matches a tag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// The key is present with any non-empty value.
    Exists,
    /// The key carries exactly this value.
    Equals(String),
    /// The key carries one of these values.
    OneOf(Vec<String>),
}

impl TagFilter {
    /// Whether a (possibly missing) tag value satisfies the filter.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (_, None) => false,
            (Self::Exists, Some(_)) => true,
            (Self::Equals(expected), Some(actual)) => expected == actual,
            (Self::OneOf(options), Some(actual)) => options.iter().any(|option| option == actual),
        }
    }
}

/// Element types a predicate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementScope {
    /// Point features only.
    Nodes,
    /// Ways only; their centre stands in for a position.
    Ways,
    /// Nodes and ways.
    #[default]
    NodesAndWays,
}

impl ElementScope {
    /// Whether entities of `kind` fall inside this scope.
    #[must_use]
    pub const fn includes(self, kind: ElementKind) -> bool {
        matches!(
            (self, kind),
            (Self::Nodes | Self::NodesAndWays, ElementKind::Node)
                | (Self::Ways | Self::NodesAndWays, ElementKind::Way)
        )
    }
}

/// Errors returned by [`QueryPredicate::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredicateError {
    /// The tag key was empty.
    #[error("predicate tag key must not be empty")]
    EmptyKey,
    /// A `OneOf` filter listed no alternatives.
    #[error("predicate on {key} must list at least one value")]
    NoAlternatives {
        /// Tag key of the rejected predicate.
        key: String,
    },
    /// The radius was zero, negative or not finite.
    #[error("predicate radius must be positive and finite, got {radius_metres}")]
    InvalidRadius {
        /// Rejected radius in metres.
        radius_metres: f64,
    },
}

/// A tag filter scoped to a radius around the query centre.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPredicate {
    key: String,
    filter: TagFilter,
    radius_metres: f64,
    scope: ElementScope,
}

impl QueryPredicate {
    /// Validates and constructs a [`QueryPredicate`] covering nodes and ways.
    pub fn new(
        key: impl Into<String>,
        filter: TagFilter,
        radius_metres: f64,
    ) -> Result<Self, PredicateError> {
        let key = key.into();
        if key.is_empty() {
            return Err(PredicateError::EmptyKey);
        }
        if matches!(&filter, TagFilter::OneOf(options) if options.is_empty()) {
            return Err(PredicateError::NoAlternatives { key });
        }
        if !(radius_metres.is_finite() && radius_metres > 0.0) {
            return Err(PredicateError::InvalidRadius { radius_metres });
        }
        Ok(Self {
            key,
            filter,
            radius_metres,
            scope: ElementScope::default(),
        })
    }

    /// Match `key=value` within `radius_metres`.
    ///
    /// # Examples
    /// ```
    /// use safewalk_core::{QueryPredicate, TagFilter};
    ///
    /// let police = QueryPredicate::equals("amenity", "police", 5_000.0)?;
    /// assert_eq!(police.filter(), &TagFilter::Equals("police".into()));
    /// assert!(QueryPredicate::equals("amenity", "police", 0.0).is_err());
    /// # Ok::<(), safewalk_core::PredicateError>(())
    /// ```
    pub fn equals(
        key: impl Into<String>,
        value: impl Into<String>,
        radius_metres: f64,
    ) -> Result<Self, PredicateError> {
        Self::new(key, TagFilter::Equals(value.into()), radius_metres)
    }

    /// Match any non-empty value of `key` within `radius_metres`.
    pub fn exists(key: impl Into<String>, radius_metres: f64) -> Result<Self, PredicateError> {
        Self::new(key, TagFilter::Exists, radius_metres)
    }

    /// Match any of `values` for `key` within `radius_metres`.
    pub fn one_of<I, V>(
        key: impl Into<String>,
        values: I,
        radius_metres: f64,
    ) -> Result<Self, PredicateError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(key, TagFilter::OneOf(values), radius_metres)
    }

    /// Restrict the predicate to the given element types.
    #[must_use]
    pub fn with_scope(mut self, scope: ElementScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    #[must_use]
    pub const fn radius_metres(&self) -> f64 {
        self.radius_metres
    }

    #[must_use]
    pub const fn scope(&self) -> ElementScope {
        self.scope
    }

    /// Whether `entity` has the right element type and tags.
    ///
    /// The radius is not consulted; see [`SpatialQuery::matches`].
    pub fn matches_tags(&self, entity: &Entity) -> bool {
        self.scope.includes(entity.kind) && self.filter.matches(entity.tag(&self.key))
    }
}

/// Errors returned by [`SpatialQuery::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpatialQueryError {
    /// No predicates were supplied.
    #[error("spatial query must contain at least one predicate")]
    Empty,
}

/// A radius-bounded, tag-filtered query around a centre point.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialQuery {
    centre: Coordinate,
    predicates: Vec<QueryPredicate>,
}

impl SpatialQuery {
    /// Validates and constructs a [`SpatialQuery`].
    pub fn new(
        centre: Coordinate,
        predicates: Vec<QueryPredicate>,
    ) -> Result<Self, SpatialQueryError> {
        if predicates.is_empty() {
            return Err(SpatialQueryError::Empty);
        }
        Ok(Self { centre, predicates })
    }

    /// A query with exactly one predicate.
    #[must_use]
    pub fn single(centre: Coordinate, predicate: QueryPredicate) -> Self {
        Self {
            centre,
            predicates: vec![predicate],
        }
    }

    #[must_use]
    pub const fn centre(&self) -> Coordinate {
        self.centre
    }

    pub fn predicates(&self) -> &[QueryPredicate] {
        &self.predicates
    }

    /// Whether `entity` satisfies at least one predicate, radius included.
    ///
    /// Entities without a position can only be matched on tags; they are
    /// reported as matching so that in-memory providers behave like a
    /// remote one returning an element with missing coordinates.
    pub fn matches(&self, entity: &Entity) -> bool {
        self.predicates.iter().any(|predicate| {
            predicate.matches_tags(entity)
                && entity.position.is_none_or(|position| {
                    distance(self.centre, position) <= predicate.radius_metres()
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn centre() -> Coordinate {
        Coordinate::new(9.3157, 76.6151).expect("valid coordinate")
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_non_positive_radius(#[case] radius: f64) {
        assert!(matches!(
            QueryPredicate::exists("shop", radius),
            Err(PredicateError::InvalidRadius { .. })
        ));
    }

    #[rstest]
    fn rejects_empty_key_and_alternatives() {
        assert_eq!(
            QueryPredicate::exists("", 10.0),
            Err(PredicateError::EmptyKey)
        );
        assert!(matches!(
            QueryPredicate::one_of("highway", Vec::<String>::new(), 10.0),
            Err(PredicateError::NoAlternatives { .. })
        ));
    }

    #[rstest]
    fn rejects_empty_query(centre: Coordinate) {
        assert_eq!(
            SpatialQuery::new(centre, Vec::new()),
            Err(SpatialQueryError::Empty)
        );
    }

    #[rstest]
    #[case(ElementScope::Nodes, ElementKind::Node, true)]
    #[case(ElementScope::Nodes, ElementKind::Way, false)]
    #[case(ElementScope::Ways, ElementKind::Way, true)]
    #[case(ElementScope::NodesAndWays, ElementKind::Relation, false)]
    fn scope_filters_element_kind(
        #[case] scope: ElementScope,
        #[case] kind: ElementKind,
        #[case] expected: bool,
    ) {
        assert_eq!(scope.includes(kind), expected);
    }

    #[rstest]
    fn each_predicate_keeps_its_own_radius(centre: Coordinate) {
        let near = QueryPredicate::equals("amenity", "hospital", 100.0).expect("predicate");
        let far = QueryPredicate::exists("shop", 10_000.0).expect("predicate");
        let query = SpatialQuery::new(centre, vec![near, far]).expect("query");

        // Roughly 1.1 km north of the centre.
        let position = Coordinate::new(9.3257, 76.6151).expect("valid coordinate");
        let hospital = Entity::node(1, position).with_tag("amenity", "hospital");
        let shop = Entity::node(2, position).with_tag("shop", "bakery");

        assert!(!query.matches(&hospital));
        assert!(query.matches(&shop));
    }

    #[rstest]
    fn one_of_matches_listed_values_only(centre: Coordinate) {
        let roads = QueryPredicate::one_of("highway", ["primary", "residential"], 500.0)
            .expect("predicate")
            .with_scope(ElementScope::Ways);
        let query = SpatialQuery::single(centre, roads);

        assert!(query.matches(&Entity::way(1, centre).with_tag("highway", "primary")));
        assert!(!query.matches(&Entity::way(2, centre).with_tag("highway", "footway")));
        assert!(!query.matches(&Entity::node(3, centre).with_tag("highway", "primary")));
    }
}
