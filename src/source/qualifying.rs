//! Qualifying classification parser

use super::{check_scope, parse_number, parse_races, single_race, DriverWire, SourceError};
use crate::models::QualifyingResult;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct QualifyingRace {
    season: String,
    round: String,
    #[serde(rename = "QualifyingResults", default)]
    qualifying_results: Vec<QualifyingWire>,
}

#[derive(Debug, Deserialize)]
struct QualifyingWire {
    position: String,
    #[serde(rename = "Driver")]
    driver: DriverWire,
    #[serde(rename = "Q1", default)]
    q1: Option<String>,
    #[serde(rename = "Q2", default)]
    q2: Option<String>,
    #[serde(rename = "Q3", default)]
    q3: Option<String>,
}

/// Parse the qualifying classification of a single race
///
/// Empty when qualifying has not been run. Positions must be 1 or greater
/// and each driver appears at most once.
pub fn parse_qualifying(
    json: &str,
    season: u32,
    round: u32,
) -> Result<Vec<QualifyingResult>, SourceError> {
    let race = match single_race(parse_races::<QualifyingRace>(json)?)? {
        Some(race) => race,
        None => return Ok(Vec::new()),
    };
    check_scope(season, round, &race.season, &race.round)?;

    let mut seen = HashSet::with_capacity(race.qualifying_results.len());
    let mut results = Vec::with_capacity(race.qualifying_results.len());

    for q in race.qualifying_results {
        let position = parse_number("position", &q.position)?;
        if position == 0 {
            return Err(SourceError::Schema(format!(
                "qualifying position for {} must be positive",
                q.driver.driver_id
            )));
        }

        if !seen.insert(q.driver.driver_id.clone()) {
            tracing::warn!(
                "Duplicate qualifying result for {} in {} round {}, keeping first",
                q.driver.driver_id,
                season,
                round
            );
            continue;
        }

        results.push(QualifyingResult {
            driver_id: q.driver.driver_id,
            position,
            q1: non_blank(q.q1),
            q2: non_blank(q.q2),
            q3: non_blank(q.q3),
        });
    }

    Ok(results)
}

fn non_blank(time: Option<String>) -> Option<String> {
    time.filter(|t| !t.trim().is_empty())
}
