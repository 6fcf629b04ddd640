//! Race entrants parser
//!
//! The entrant list comes from `GET {base}/{season}/{round}/results.json`.
//! Before the race is run the endpoint answers with an empty race list.

use super::{check_scope, parse_races, single_race, DriverWire, SourceError};
use crate::models::Entrant;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct ResultsRace {
    season: String,
    round: String,
    #[serde(rename = "Results", default)]
    results: Vec<ResultWire>,
}

#[derive(Debug, Deserialize)]
struct ResultWire {
    #[serde(rename = "Driver")]
    driver: DriverWire,
    #[serde(rename = "Constructor", default)]
    constructor: Option<ConstructorWire>,
}

#[derive(Debug, Deserialize)]
struct ConstructorWire {
    name: String,
}

/// Parse the entrants of a single race, in classification order
pub fn parse_entrants(json: &str, season: u32, round: u32) -> Result<Vec<Entrant>, SourceError> {
    let race = match single_race(parse_races::<ResultsRace>(json)?)? {
        Some(race) => race,
        None => return Ok(Vec::new()),
    };
    check_scope(season, round, &race.season, &race.round)?;

    let mut seen = HashSet::with_capacity(race.results.len());
    let mut entrants = Vec::with_capacity(race.results.len());

    for result in race.results {
        let driver = result.driver;
        if !seen.insert(driver.driver_id.clone()) {
            tracing::warn!(
                "Duplicate entrant {} in {} round {}, keeping first",
                driver.driver_id,
                season,
                round
            );
            continue;
        }

        entrants.push(Entrant {
            display_name: driver.display_name(),
            code: driver.code.filter(|c| !c.trim().is_empty()),
            permanent_number: driver.permanent_number,
            constructor: result.constructor.map(|c| c.name),
            driver_id: driver.driver_id,
        });
    }

    Ok(entrants)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"
    {"MRData":{"RaceTable":{"season":"2025","round":"1","Races":[
      {"season":"2025","round":"1","raceName":"Australian Grand Prix","date":"2025-03-16",
       "Results":[
        {"number":"4","position":"1","points":"25",
         "Driver":{"driverId":"norris","permanentNumber":"4","code":"NOR",
                   "givenName":"Lando","familyName":"Norris","nationality":"British"},
         "Constructor":{"constructorId":"mclaren","name":"McLaren"}},
        {"number":"1","position":"2","points":"18",
         "Driver":{"driverId":"max_verstappen","permanentNumber":"33","code":"VER",
                   "givenName":"Max","familyName":"Verstappen"},
         "Constructor":{"constructorId":"red_bull","name":"Red Bull"}},
        {"number":"99","position":"3",
         "Driver":{"driverId":"de_vries","givenName":"Nyck","familyName":"de Vries"}}
       ]}
    ]}}}
    "#;

    #[test]
    fn test_parse_entrants() {
        let entrants = parse_entrants(RESULTS, 2025, 1).unwrap();
        assert_eq!(entrants.len(), 3);

        assert_eq!(entrants[0].driver_id, "norris");
        assert_eq!(entrants[0].display_name, "Lando Norris");
        assert_eq!(entrants[0].label(), "Lando Norris (NOR)");
        assert_eq!(entrants[0].constructor.as_deref(), Some("McLaren"));
        assert_eq!(entrants[1].permanent_number.as_deref(), Some("33"));
    }

    #[test]
    fn test_entrant_without_code_or_constructor() {
        let entrants = parse_entrants(RESULTS, 2025, 1).unwrap();
        let de_vries = &entrants[2];
        assert_eq!(de_vries.code, None);
        assert_eq!(de_vries.constructor, None);
        assert_eq!(de_vries.display_code(), "de_vries");
    }

    #[test]
    fn test_no_race_yet_is_empty() {
        let json = r#"{"MRData":{"RaceTable":{"season":"2025","round":"20","Races":[]}}}"#;
        assert!(parse_entrants(json, 2025, 20).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_other_round() {
        let result = parse_entrants(RESULTS, 2025, 2);
        assert!(matches!(result, Err(SourceError::RoundMismatch { .. })));
    }

    #[test]
    fn test_duplicate_driver_kept_once() {
        let json = r#"{"MRData":{"RaceTable":{"Races":[
          {"season":"2025","round":"1","Results":[
            {"Driver":{"driverId":"norris","code":"NOR"}},
            {"Driver":{"driverId":"norris","code":"NOR"}}
          ]}
        ]}}}"#;
        let entrants = parse_entrants(json, 2025, 1).unwrap();
        assert_eq!(entrants.len(), 1);
        assert_eq!(entrants[0].display_name, "norris");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_entrants(RESULTS, 2025, 1).unwrap();
        let second = parse_entrants(RESULTS, 2025, 1).unwrap();
        assert_eq!(first, second);
    }
}
