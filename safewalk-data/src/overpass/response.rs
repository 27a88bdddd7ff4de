//! Overpass JSON response types.
//!
//! Only the fields the feature engine reads are modelled. Unknown fields
//! are ignored so the decoder tolerates additions to the format. Elements
//! are decoded one at a time: an element that does not fit the model is
//! skipped while the rest of the reply is kept.

use std::collections::HashMap;

use log::debug;
use safewalk_core::{Coordinate, ElementKind, Entity, ProviderError};
use serde::Deserialize;
use serde_json::Value;

/// Top-level Overpass reply.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Value>,
    /// Server-side diagnostics, e.g. query timeouts or memory exhaustion.
    pub remark: Option<String>,
}

/// One OSM element as returned with `out center;`.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCentre>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Centre reported for ways and relations. Either half may be missing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct OverpassCentre {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl OverpassResponse {
    /// Decode a raw response body.
    pub(crate) fn from_slice(body: &[u8]) -> Result<Self, ProviderError> {
        serde_json::from_slice(body).map_err(|err| ProviderError::MalformedResponse {
            message: format!("failed to parse Overpass response: {err}"),
        })
    }

    /// Convert the reply into core entities.
    ///
    /// A remark reporting a runtime error means the server gave up part
    /// way through, so the element list cannot be trusted as complete.
    pub(crate) fn into_entities(self) -> Result<Vec<Entity>, ProviderError> {
        if let Some(remark) = self.remark.filter(|r| r.contains("runtime error")) {
            return Err(ProviderError::Service { message: remark });
        }
        Ok(self
            .elements
            .into_iter()
            .filter_map(OverpassElement::decode)
            .filter_map(OverpassElement::into_entity)
            .collect())
    }
}

impl OverpassElement {
    fn decode(raw: Value) -> Option<Self> {
        match Self::deserialize(&raw) {
            Ok(element) => Some(element),
            Err(err) => {
                debug!("skipping undecodable Overpass element: {err}");
                None
            }
        }
    }

    fn element_kind(&self) -> Option<ElementKind> {
        match self.kind.as_str() {
            "node" => Some(ElementKind::Node),
            "way" => Some(ElementKind::Way),
            "relation" => Some(ElementKind::Relation),
            _ => None,
        }
    }

    /// Node coordinates win; otherwise the centre reported for ways.
    fn position(&self) -> Option<Coordinate> {
        let (lat, lon) = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (_, _, Some(OverpassCentre { lat: Some(lat), lon: Some(lon) })) => (lat, lon),
            _ => return None,
        };
        match Coordinate::new(lat, lon) {
            Ok(position) => Some(position),
            Err(err) => {
                debug!("{} {} has an invalid position: {err}", self.kind, self.id);
                None
            }
        }
    }

    fn into_entity(self) -> Option<Entity> {
        let Some(kind) = self.element_kind() else {
            debug!("ignoring element {} of unknown type {:?}", self.id, self.kind);
            return None;
        };
        let position = self.position();
        Some(Entity::new(self.id, kind, self.tags, position))
    }
}
