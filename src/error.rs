use chrono::NaiveDate;
use std::fmt;

use crate::source::SourceError;

/// Reason the pipeline stopped before reaching a prediction.
///
/// None of these are fatal: the caller shows the message and lets the
/// user pick different inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked {
    /// Transport, status, timeout or parse failure upstream
    SourceUnavailable { reason: String },
    /// Every race of the season is in the past
    NoUpcomingRace { season: u32 },
    /// Explicitly selected round is not on the schedule
    RaceNotFound { season: u32, round: u32 },
    /// Entrant list not published yet
    EntrantsUnavailable { season: u32, round: u32 },
    /// Qualifying not run yet
    QualifyingUnavailable { season: u32, round: u32 },
    /// Driver entered but set no qualifying time
    DriverHasNoQualifyingResult { driver_id: String },
    /// Selected driver is not an entrant of this race
    UnknownEntrant { driver_id: String },
}

impl Blocked {
    /// True for "upstream has no data yet" as opposed to "upstream is broken"
    pub fn is_not_yet_available(&self) -> bool {
        matches!(
            self,
            Blocked::NoUpcomingRace { .. }
                | Blocked::EntrantsUnavailable { .. }
                | Blocked::QualifyingUnavailable { .. }
                | Blocked::DriverHasNoQualifyingResult { .. }
        )
    }
}

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blocked::SourceUnavailable { reason } => {
                write!(f, "Race data source unavailable: {}", reason)
            }
            Blocked::NoUpcomingRace { season } => {
                write!(f, "No upcoming race found in the {} season", season)
            }
            Blocked::RaceNotFound { season, round } => {
                write!(f, "Round {} is not on the {} schedule", round, season)
            }
            Blocked::EntrantsUnavailable { season, round } => {
                write!(f, "No drivers found for {} round {} yet", season, round)
            }
            Blocked::QualifyingUnavailable { season, round } => write!(
                f,
                "Qualifying data for {} round {} is not available yet",
                season, round
            ),
            Blocked::DriverHasNoQualifyingResult { driver_id } => {
                write!(f, "Driver '{}' has not set a qualifying time", driver_id)
            }
            Blocked::UnknownEntrant { driver_id } => {
                write!(f, "Driver '{}' is not entered in this race", driver_id)
            }
        }
    }
}

impl std::error::Error for Blocked {}

impl From<SourceError> for Blocked {
    fn from(err: SourceError) -> Self {
        Blocked::SourceUnavailable {
            reason: err.to_string(),
        }
    }
}

/// First season of the world championship
const FIRST_SEASON: u32 = 1950;

/// Validation functions
pub fn validate_season(season: u32) -> Result<u32, String> {
    if season < FIRST_SEASON {
        return Err(format!(
            "Season must be {} or later, got {}",
            FIRST_SEASON, season
        ));
    }
    Ok(season)
}

pub fn validate_round(round: u32) -> Result<u32, String> {
    if round == 0 {
        return Err("Round numbers start at 1".to_string());
    }
    Ok(round)
}

/// Parse an evaluation date in YYYY-MM-DD format
pub fn parse_eval_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_season() {
        assert_eq!(validate_season(2025), Ok(2025));
        assert_eq!(validate_season(1950), Ok(1950));
        assert!(validate_season(1949).is_err());
        assert!(validate_season(0).is_err());
    }

    #[test]
    fn test_validate_round() {
        assert_eq!(validate_round(1), Ok(1));
        assert_eq!(validate_round(24), Ok(24));
        assert!(validate_round(0).is_err());
    }

    #[test]
    fn test_parse_eval_date() {
        assert_eq!(
            parse_eval_date("2025-03-10"),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
        );
        assert!(parse_eval_date("10/03/2025").is_err());
        assert!(parse_eval_date("2025-02-30").is_err());
    }

    #[test]
    fn test_blocked_display() {
        let err = Blocked::DriverHasNoQualifyingResult {
            driver_id: "hamilton".to_string(),
        };
        assert!(err.to_string().contains("hamilton"));

        let err = Blocked::NoUpcomingRace { season: 2025 };
        assert!(err.to_string().contains("2025"));
    }

    #[test]
    fn test_not_yet_available_classification() {
        assert!(!Blocked::SourceUnavailable {
            reason: "timeout".to_string()
        }
        .is_not_yet_available());
        assert!(Blocked::QualifyingUnavailable {
            season: 2025,
            round: 3
        }
        .is_not_yet_available());
        assert!(Blocked::EntrantsUnavailable {
            season: 2025,
            round: 3
        }
        .is_not_yet_available());
        assert!(Blocked::NoUpcomingRace { season: 2025 }.is_not_yet_available());
        assert!(Blocked::DriverHasNoQualifyingResult {
            driver_id: "hamilton".to_string()
        }
        .is_not_yet_available());
    }

    #[test]
    fn test_input_mistakes_are_not_pending_data() {
        assert!(!Blocked::RaceNotFound {
            season: 2025,
            round: 30
        }
        .is_not_yet_available());
        assert!(!Blocked::UnknownEntrant {
            driver_id: "senna".to_string()
        }
        .is_not_yet_available());
    }

    #[test]
    fn test_from_source_error() {
        let blocked: Blocked = SourceError::Schema("missing MRData".to_string()).into();
        match blocked {
            Blocked::SourceUnavailable { reason } => assert!(reason.contains("missing MRData")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
