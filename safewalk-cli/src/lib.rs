//! Command-line interface for the Safewalk feature engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod features;

pub use error::CliError;

pub(crate) use features::FeaturesArgs;

pub(crate) const ARG_PLACE: &str = "place";
pub(crate) const ARG_DATE: &str = "date";
pub(crate) const ARG_TIME: &str = "time";
pub(crate) const ARG_OVERPASS_URL: &str = "overpass-url";
pub(crate) const ARG_NOMINATIM_URL: &str = "nominatim-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_RETRY_ATTEMPTS: &str = "retry-attempts";
pub(crate) const ENV_PLACE: &str = "SAFEWALK_CMDS_FEATURES_PLACE";
pub(crate) const ENV_DATE: &str = "SAFEWALK_CMDS_FEATURES_DATE";
pub(crate) const ENV_TIME: &str = "SAFEWALK_CMDS_FEATURES_TIME";

/// Run the Safewalk CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Features(args) => features::run_features(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "safewalk",
    about = "Extract area safety features from OpenStreetMap data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Collect the feature record for a place at a planned travel time.
    Features(FeaturesArgs),
}

#[cfg(test)]
mod tests;
