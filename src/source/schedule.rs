//! Season schedule parser
//!
//! `GET {base}/{season}.json` lists every round of the season in calendar order.

use super::{parse_number, parse_races, SourceError};
use crate::models::Race;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RaceWire {
    season: String,
    round: String,
    #[serde(rename = "raceName")]
    race_name: String,
    #[serde(rename = "Circuit")]
    circuit: CircuitWire,
    date: String,
    #[serde(default)]
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CircuitWire {
    #[serde(rename = "circuitName")]
    circuit_name: String,
    #[serde(rename = "Location", default)]
    location: Option<LocationWire>,
}

#[derive(Debug, Default, Deserialize)]
struct LocationWire {
    #[serde(default)]
    locality: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Parse a season schedule
///
/// An empty list is returned as-is; deciding whether that is acceptable is
/// up to the caller. Any race that belongs to another season, or whose
/// round or date cannot be read, fails the whole schedule.
pub fn parse_schedule(json: &str, season: u32) -> Result<Vec<Race>, SourceError> {
    let wire: Vec<RaceWire> = parse_races(json)?;
    let mut races = Vec::with_capacity(wire.len());

    for race in wire {
        let race_season = parse_number("season", &race.season)?;
        if race_season != season {
            return Err(SourceError::Schema(format!(
                "schedule for {} contains a race from {}",
                season, race_season
            )));
        }

        let round = parse_number("round", &race.round)?;
        let date = NaiveDate::parse_from_str(&race.date, "%Y-%m-%d").map_err(|e| {
            SourceError::Schema(format!("round {} has invalid date '{}': {}", round, race.date, e))
        })?;

        let location = race.circuit.location.unwrap_or_default();

        races.push(Race {
            season,
            round,
            name: race.race_name,
            date,
            time: race.time,
            circuit_name: race.circuit.circuit_name,
            locality: location.locality,
            country: location.country.unwrap_or_default(),
        });
    }

    Ok(races)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = r#"
    {"MRData":{"xmlns":"","series":"f1","limit":"100","offset":"0","total":"2",
      "RaceTable":{"season":"2025","Races":[
        {"season":"2025","round":"1","url":"https://en.wikipedia.org/wiki/2025_Australian_Grand_Prix",
         "raceName":"Australian Grand Prix",
         "Circuit":{"circuitId":"albert_park","circuitName":"Albert Park Grand Prix Circuit",
           "Location":{"lat":"-37.8497","long":"144.968","locality":"Melbourne","country":"Australia"}},
         "date":"2025-03-16","time":"04:00:00Z"},
        {"season":"2025","round":"2","raceName":"Chinese Grand Prix",
         "Circuit":{"circuitId":"shanghai","circuitName":"Shanghai International Circuit",
           "Location":{"locality":"Shanghai","country":"China"}},
         "date":"2025-03-23"}
      ]}}}
    "#;

    #[test]
    fn test_parse_schedule() {
        let races = parse_schedule(SCHEDULE, 2025).unwrap();
        assert_eq!(races.len(), 2);

        let first = &races[0];
        assert_eq!(first.key(), (2025, 1));
        assert_eq!(first.name, "Australian Grand Prix");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
        assert_eq!(first.time.as_deref(), Some("04:00:00Z"));
        assert_eq!(first.circuit_name, "Albert Park Grand Prix Circuit");
        assert_eq!(first.locality.as_deref(), Some("Melbourne"));
        assert_eq!(first.country, "Australia");

        assert_eq!(races[1].round, 2);
        assert_eq!(races[1].time, None);
    }

    #[test]
    fn test_parse_empty_schedule() {
        let json = r#"{"MRData":{"RaceTable":{"season":"2031","Races":[]}}}"#;
        assert!(parse_schedule(json, 2031).unwrap().is_empty());
    }

    #[test]
    fn test_missing_location_is_tolerated() {
        let json = r#"{"MRData":{"RaceTable":{"Races":[
            {"season":"2025","round":"5","raceName":"Saudi Arabian Grand Prix",
             "Circuit":{"circuitName":"Jeddah Corniche Circuit"},"date":"2025-04-20"}
        ]}}}"#;
        let races = parse_schedule(json, 2025).unwrap();
        assert_eq!(races[0].country, "");
        assert_eq!(races[0].locality, None);
    }

    #[test]
    fn test_rejects_other_season() {
        let result = parse_schedule(SCHEDULE, 2024);
        assert!(matches!(result, Err(SourceError::Schema(_))));
    }

    #[test]
    fn test_rejects_bad_date() {
        let json = r#"{"MRData":{"RaceTable":{"Races":[
            {"season":"2025","round":"1","raceName":"X","Circuit":{"circuitName":"Y"},"date":"16/03/2025"}
        ]}}}"#;
        assert!(parse_schedule(json, 2025).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            parse_schedule("{\"MRData\":", 2025),
            Err(SourceError::Json(_))
        ));
    }
}
