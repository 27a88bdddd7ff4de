//! Transport adapters for the Safewalk feature engine.
//!
//! Responsibilities:
//! - Serialise provider-neutral spatial queries into Overpass QL.
//! - Fetch map entities from an Overpass endpoint over HTTP.
//! - Resolve place names through a Nominatim endpoint.
//!
//! Boundaries:
//! - Do not encode feature rules (live in `safewalk-core`).
//! - Keep blocking I/O off async executors; bridge async `reqwest` calls
//!   onto the synchronous core traits.
//!
//! Invariants:
//! - Transport failures never masquerade as empty results.
//! - No global mutable state.

mod http;
pub mod nominatim;
pub mod overpass;

#[doc(hidden)]
pub mod test_support;

pub use http::{DEFAULT_USER_AGENT, HttpClientConfig, ProviderBuildError};
pub use nominatim::{DEFAULT_NOMINATIM_URL, NominatimGeocoder};
pub use overpass::{DEFAULT_OVERPASS_URL, OverpassProvider, render_query};
