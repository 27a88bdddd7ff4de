//! Features command implementation for the Safewalk CLI.

use std::io::Write;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, NaiveTime, Timelike, Weekday};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safewalk_core::{
    Coordinate, FeatureRecord, Geocoder, MapProvider, RetryPolicy, RetryingProvider, TimeContext,
    collect_features,
};
use safewalk_data::{
    DEFAULT_NOMINATIM_URL, DEFAULT_OVERPASS_URL, HttpClientConfig, NominatimGeocoder,
    OverpassProvider,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATE, ARG_NOMINATIM_URL, ARG_OVERPASS_URL, ARG_PLACE, ARG_RETRY_ATTEMPTS,
    ARG_TIME, ARG_TIMEOUT_SECS, CliError, ENV_DATE, ENV_PLACE, ENV_TIME,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI arguments for the `features` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode a place, sweep the surrounding OpenStreetMap data \
                 through an Overpass instance and print the feature record \
                 for the planned travel date and time as JSON.",
    about = "Collect safety features for a place"
)]
#[ortho_config(prefix = "SAFEWALK")]
pub(crate) struct FeaturesArgs {
    /// Place name to geocode (e.g. "Chengannur, Kerala").
    #[arg(value_name = "place")]
    #[serde(default)]
    pub(crate) place: Option<String>,
    /// Travel date as YYYY-MM-DD; must not be in the past.
    #[arg(long = ARG_DATE, value_name = "date")]
    #[serde(default)]
    pub(crate) date: Option<String>,
    /// Travel time, e.g. "9 AM", "9:30 PM" or "21:00".
    #[arg(long = ARG_TIME, value_name = "time")]
    #[serde(default)]
    pub(crate) time: Option<String>,
    /// Base URL for the Overpass server.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Base URL for the Nominatim server.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Attempts per map query, including the first.
    #[arg(long = ARG_RETRY_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) retry_attempts: Option<u32>,
}

impl FeaturesArgs {
    pub(crate) fn into_config(self) -> Result<FeaturesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FeaturesConfig::try_from(merged)
    }
}

/// Resolved `features` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeaturesConfig {
    pub(crate) place: String,
    pub(crate) date: NaiveDate,
    pub(crate) time: NaiveTime,
    pub(crate) overpass_url: String,
    pub(crate) nominatim_url: String,
    pub(crate) timeout: Duration,
    pub(crate) retry: RetryPolicy,
}

impl FeaturesConfig {
    /// Reject travel dates before `today`.
    pub(crate) fn validate_date(&self, today: NaiveDate) -> Result<(), CliError> {
        if self.date < today {
            return Err(CliError::DateInPast {
                date: self.date,
                today,
            });
        }
        Ok(())
    }

    /// Hour of day, night flag and weekend flag for the planned trip.
    pub(crate) fn time_context(&self) -> Result<TimeContext, CliError> {
        let weekend = matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun);
        let hour = u8::try_from(self.time.hour()).map_err(|_| CliError::InvalidTime {
            value: self.time.to_string(),
        })?;
        Ok(TimeContext::from_clock(hour, weekend)?)
    }
}

impl TryFrom<FeaturesArgs> for FeaturesConfig {
    type Error = CliError;

    fn try_from(args: FeaturesArgs) -> Result<Self, Self::Error> {
        let place = args
            .place
            .filter(|place| !place.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_PLACE,
                env: ENV_PLACE,
            })?;
        let date = args.date.ok_or(CliError::MissingArgument {
            field: ARG_DATE,
            env: ENV_DATE,
        })?;
        let time = args.time.ok_or(CliError::MissingArgument {
            field: ARG_TIME,
            env: ENV_TIME,
        })?;

        let timeout_secs = args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CliError::ZeroTimeout {
                field: ARG_TIMEOUT_SECS,
            });
        }
        let mut retry = RetryPolicy::default();
        if let Some(attempts) = args.retry_attempts {
            retry = retry.with_max_attempts(attempts);
        }

        Ok(Self {
            place,
            date: parse_date(&date)?,
            time: parse_time(&time)?,
            overpass_url: args
                .overpass_url
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_owned()),
            nominatim_url: args
                .nominatim_url
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned()),
            timeout: Duration::from_secs(timeout_secs),
            retry,
        })
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|source| CliError::InvalidDate {
        value: value.to_owned(),
        source,
    })
}

/// Parse a twelve-hour (`9 AM`, `9:30 pm`) or 24-hour (`21:00`) clock time.
pub(crate) fn parse_time(value: &str) -> Result<NaiveTime, CliError> {
    let trimmed = value.trim();
    // chrono needs minutes, so a bare "9 AM" gains ":00".
    let normalised = match trimmed.split_once(' ') {
        Some((hour, meridiem)) if !hour.contains(':') => format!("{hour}:00 {meridiem}"),
        _ => trimmed.to_owned(),
    };
    ["%I:%M %p", "%H:%M"]
        .into_iter()
        .find_map(|format| NaiveTime::parse_from_str(&normalised, format).ok())
        .ok_or_else(|| CliError::InvalidTime {
            value: value.to_owned(),
        })
}

/// Collaborators used by a single `features` invocation.
pub(crate) struct FeatureServices {
    pub(crate) geocoder: Box<dyn Geocoder>,
    pub(crate) provider: Box<dyn MapProvider>,
}

/// Builds the geocoder and map provider for the current invocation.
pub(crate) trait FeatureServicesBuilder {
    fn build(&self, config: &FeaturesConfig) -> Result<FeatureServices, CliError>;
}

pub(crate) struct DefaultFeatureServicesBuilder;

impl FeatureServicesBuilder for DefaultFeatureServicesBuilder {
    fn build(&self, config: &FeaturesConfig) -> Result<FeatureServices, CliError> {
        let geocoder = NominatimGeocoder::with_config(
            HttpClientConfig::new(config.nominatim_url.clone()).with_timeout(config.timeout),
        )
        .map_err(|source| CliError::BuildGeocoder {
            base_url: config.nominatim_url.clone(),
            source,
        })?;
        let overpass = OverpassProvider::with_config(
            HttpClientConfig::new(config.overpass_url.clone()).with_timeout(config.timeout),
        )
        .map_err(|source| CliError::BuildMapProvider {
            base_url: config.overpass_url.clone(),
            source,
        })?;
        Ok(FeatureServices {
            geocoder: Box::new(geocoder),
            provider: Box::new(RetryingProvider::new(overpass, config.retry)),
        })
    }
}

/// JSON document printed by the `features` command.
#[derive(Debug, Serialize)]
pub(crate) struct FeatureReport {
    pub(crate) place: String,
    pub(crate) date: NaiveDate,
    pub(crate) location: Coordinate,
    pub(crate) features: FeatureRecord,
}

pub(crate) fn run_features(args: FeaturesArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let today = Local::now().date_naive();
    run_features_with(args, &DefaultFeatureServicesBuilder, &mut stdout, today)
}

pub(crate) fn run_features_with(
    args: FeaturesArgs,
    builder: &dyn FeatureServicesBuilder,
    writer: &mut dyn Write,
    today: NaiveDate,
) -> Result<(), CliError> {
    let report = execute_features(args, builder, today)?;
    write_report(writer, &report)
}

fn execute_features(
    args: FeaturesArgs,
    builder: &dyn FeatureServicesBuilder,
    today: NaiveDate,
) -> Result<FeatureReport, CliError> {
    let config = args.into_config()?;
    config.validate_date(today)?;
    let time = config.time_context()?;
    let services = builder.build(&config)?;

    let location = services.geocoder.geocode(&config.place)?;
    info!("collecting features for {:?} at {location}", config.place);
    let features = collect_features(services.provider.as_ref(), location, time)
        .map_err(|source| CliError::Features { source })?;

    Ok(FeatureReport {
        place: config.place,
        date: config.date,
        location,
        features,
    })
}

fn write_report(writer: &mut dyn Write, report: &FeatureReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<FeaturesConfig, CliError> {
    let merged = FeaturesArgs::merge_from_layers(layers).map_err(CliError::from)?;
    FeaturesConfig::try_from(merged)
}
