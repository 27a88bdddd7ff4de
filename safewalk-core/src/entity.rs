use std::collections::HashMap;

use crate::Coordinate;

/// OpenStreetMap-style free-form key/value tags.
pub type Tags = HashMap<String, String>;

/// Map element type reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ElementKind {
    /// A single point.
    Node,
    /// A polyline or closed area.
    Way,
    /// A grouping of other elements.
    Relation,
}

/// A single tagged map record returned by a [`MapProvider`](crate::MapProvider).
///
/// `position` is the element's own coordinate for nodes and the
/// provider-computed centre for ways and relations. Entities without a
/// resolvable position are skipped by every distance-based reduction.
///
/// # Examples
/// ```
/// use safewalk_core::{Coordinate, Entity};
///
/// # fn main() -> Result<(), safewalk_core::CoordinateError> {
/// let lamp = Entity::node(7, Coordinate::new(9.31, 76.61)?)
///     .with_tag("highway", "street_lamp");
///
/// assert!(lamp.tag_is("highway", "street_lamp"));
/// assert!(!lamp.has_tag("shop"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// OSM identifier, unique within its element kind.
    pub id: u64,
    /// Node, way or relation.
    pub kind: ElementKind,
    /// Raw OSM tags.
    pub tags: Tags,
    /// Node coordinates or the reported centre; `None` when neither is usable.
    pub position: Option<Coordinate>,
}

impl Entity {
    /// Construct an entity from its raw parts.
    pub fn new(id: u64, kind: ElementKind, tags: Tags, position: Option<Coordinate>) -> Self {
        Self {
            id,
            kind,
            tags,
            position,
        }
    }

    /// Construct an untagged node at `position`.
    pub fn node(id: u64, position: Coordinate) -> Self {
        Self::new(id, ElementKind::Node, Tags::new(), Some(position))
    }

    /// Construct an untagged way whose centre is `position`.
    pub fn way(id: u64, position: Coordinate) -> Self {
        Self::new(id, ElementKind::Way, Tags::new(), Some(position))
    }

    /// Add or replace a tag, returning the updated entity.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Tag value for `key`, ignoring empty values.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Whether `key` carries a non-empty value.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tag(key).is_some()
    }

    /// Whether `key` is tagged with exactly `value`.
    pub fn tag_is(&self, key: &str, value: &str) -> bool {
        self.tag(key) == Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag_values_count_as_absent() {
        let origin = Coordinate::new(0.0, 0.0).expect("valid coordinate");
        let entity = Entity::node(1, origin).with_tag("shop", "");
        assert!(!entity.has_tag("shop"));
        assert_eq!(entity.tag("shop"), None);
    }
}
