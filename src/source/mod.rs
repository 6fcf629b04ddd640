//! Race data source backed by the Ergast-compatible F1 API
//!
//! Every endpoint wraps its payload in the same `MRData.RaceTable.Races`
//! envelope; the per-endpoint modules only describe what sits inside a race.
//!
//! # Example
//!
//! ```no_run
//! use f1_predictor::source::{ErgastClient, RaceSource, SourceConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ErgastClient::new(SourceConfig::default())?;
//!
//!     let races = client.schedule(2025).await?;
//!     println!("{} races on the calendar", races.len());
//!
//!     Ok(())
//! }
//! ```

mod cache;
mod client;
mod qualifying;
mod results;
mod schedule;

pub use cache::CachedSource;
pub use client::{ErgastClient, SourceConfig, SourceError, DEFAULT_BASE_URL};
pub use qualifying::parse_qualifying;
pub use results::parse_entrants;
pub use schedule::parse_schedule;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{Entrant, QualifyingResult, Race};

/// The three read-only queries the pipeline needs.
///
/// Empty vectors mean "not published yet"; `Err` means the source itself
/// could not answer.
#[allow(async_fn_in_trait)]
pub trait RaceSource {
    /// Full schedule of a season, in calendar order
    async fn schedule(&self, season: u32) -> Result<Vec<Race>, SourceError>;

    /// Entrants classified in the race results
    async fn entrants(&self, season: u32, round: u32) -> Result<Vec<Entrant>, SourceError>;

    /// Qualifying classification
    async fn qualifying(
        &self,
        season: u32,
        round: u32,
    ) -> Result<Vec<QualifyingResult>, SourceError>;
}

impl<S: RaceSource> RaceSource for &S {
    async fn schedule(&self, season: u32) -> Result<Vec<Race>, SourceError> {
        (**self).schedule(season).await
    }

    async fn entrants(&self, season: u32, round: u32) -> Result<Vec<Entrant>, SourceError> {
        (**self).entrants(season, round).await
    }

    async fn qualifying(
        &self,
        season: u32,
        round: u32,
    ) -> Result<Vec<QualifyingResult>, SourceError> {
        (**self).qualifying(season, round).await
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<R> {
    #[serde(rename = "MRData")]
    mr_data: MrData<R>,
}

#[derive(Debug, Deserialize)]
struct MrData<R> {
    #[serde(rename = "RaceTable")]
    race_table: RaceTable<R>,
}

#[derive(Debug, Deserialize)]
struct RaceTable<R> {
    #[serde(rename = "Races", default = "Vec::new")]
    races: Vec<R>,
}

/// Driver block shared by the results and qualifying payloads
#[derive(Debug, Deserialize)]
pub(crate) struct DriverWire {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "permanentNumber", default)]
    pub permanent_number: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "givenName", default)]
    pub given_name: Option<String>,
    #[serde(rename = "familyName", default)]
    pub family_name: Option<String>,
}

impl DriverWire {
    /// "Given Family", or the driver id when both names are missing
    pub fn display_name(&self) -> String {
        let name = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            self.driver_id.clone()
        } else {
            name
        }
    }
}

/// Unwrap the `MRData.RaceTable.Races` envelope
pub(crate) fn parse_races<R: DeserializeOwned>(json: &str) -> Result<Vec<R>, SourceError> {
    let envelope: Envelope<R> = serde_json::from_str(json)?;
    Ok(envelope.mr_data.race_table.races)
}

/// Parse a numeric field the API encodes as a string
pub(crate) fn parse_number(field: &str, value: &str) -> Result<u32, SourceError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| SourceError::Schema(format!("{} is not a number: '{}'", field, value)))
}

/// Reject a payload whose race belongs to a different (season, round)
pub(crate) fn check_scope(
    season: u32,
    round: u32,
    got_season: &str,
    got_round: &str,
) -> Result<(), SourceError> {
    let got = (
        parse_number("season", got_season)?,
        parse_number("round", got_round)?,
    );
    if got != (season, round) {
        return Err(SourceError::RoundMismatch {
            expected: (season, round),
            actual: got,
        });
    }
    Ok(())
}

/// Zero-or-one race per (season, round) query
pub(crate) fn single_race<R>(mut races: Vec<R>) -> Result<Option<R>, SourceError> {
    match races.len() {
        0 => Ok(None),
        1 => Ok(races.pop()),
        n => Err(SourceError::Schema(format!(
            "expected at most one race, got {}",
            n
        ))),
    }
}
