//! Error types emitted by the Safewalk CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use chrono::NaiveDate;
use safewalk_core::{FeatureError, GeocodeError, TimeContextError};
use safewalk_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the Safewalk CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The travel date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid date {value:?}, expected YYYY-MM-DD: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The travel date lies before today.
    #[error("travel date {date} is in the past (today is {today})")]
    DateInPast { date: NaiveDate, today: NaiveDate },
    /// The travel time is not a clock time such as `9 AM`.
    #[error("invalid time {value:?}, expected a time such as \"9 AM\" or \"21:00\"")]
    InvalidTime { value: String },
    /// The derived time context was rejected.
    #[error(transparent)]
    TimeContext(#[from] TimeContextError),
    /// The request timeout must be at least one second.
    #[error("--{field} must be at least 1 second")]
    ZeroTimeout { field: &'static str },
    /// Constructing the map provider failed.
    #[error("failed to build map provider for {base_url:?}: {source}")]
    BuildMapProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Constructing the geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The place could not be resolved to a coordinate.
    #[error("failed to geocode place: {0}")]
    Geocode(#[from] GeocodeError),
    /// Feature collection failed.
    #[error("feature collection failed: {source}")]
    Features {
        #[source]
        source: FeatureError,
    },
    /// Serialising the feature report failed.
    #[error("failed to serialise feature report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the feature report failed.
    #[error("failed to write feature report: {0}")]
    WriteOutput(#[source] std::io::Error),
}
