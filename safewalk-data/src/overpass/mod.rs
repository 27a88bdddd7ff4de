//! Overpass API adapter.
//!
//! [`render_query`] turns a provider-neutral [`safewalk_core::SpatialQuery`]
//! into Overpass QL, and [`OverpassProvider`] posts it to an interpreter
//! endpoint and decodes the JSON reply into core entities.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL>

mod provider;
mod query;
mod response;

pub use provider::{DEFAULT_OVERPASS_URL, OverpassProvider};
pub use query::render_query;
