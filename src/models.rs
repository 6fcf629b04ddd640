use chrono::NaiveDate;

/// A scheduled race, identified by (season, round)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Race {
    pub season: u32,
    pub round: u32,
    pub name: String,
    pub date: NaiveDate,
    /// Start time as published by the API (e.g. "04:00:00Z")
    pub time: Option<String>,
    pub circuit_name: String,
    pub locality: Option<String>,
    pub country: String,
}

impl Race {
    /// Identity of the race within the schedule
    pub fn key(&self) -> (u32, u32) {
        (self.season, self.round)
    }

    /// Selector label, e.g. "Australian Grand Prix (2025-03-16)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.date)
    }
}

/// A driver entered in a specific race
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrant {
    pub driver_id: String,
    pub display_name: String,
    pub code: Option<String>,
    pub permanent_number: Option<String>,
    pub constructor: Option<String>,
}

impl Entrant {
    /// Short code if the API published one, otherwise the stable driver id
    pub fn display_code(&self) -> &str {
        match self.code.as_deref() {
            Some(code) if !code.trim().is_empty() => code,
            _ => &self.driver_id,
        }
    }

    /// Selector label, e.g. "Max Verstappen (VER)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.display_code())
    }
}

/// Qualifying classification for one driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifyingResult {
    pub driver_id: String,
    pub position: u32,
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
}

impl QualifyingResult {
    /// Best session time reached (Q3 over Q2 over Q1)
    pub fn best_time(&self) -> Option<&str> {
        self.q3
            .as_deref()
            .or(self.q2.as_deref())
            .or(self.q1.as_deref())
    }
}

/// Sole input of the placeholder estimate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionInput {
    pub driver_id: String,
    pub qualifying_position: u32,
}

/// Placeholder finishing-position estimate
#[derive(Debug, Clone, PartialEq)]
pub struct FinishEstimate {
    pub driver_id: String,
    pub qualifying_position: u32,
    pub expected_position: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrant(code: Option<&str>) -> Entrant {
        Entrant {
            driver_id: "max_verstappen".to_string(),
            display_name: "Max Verstappen".to_string(),
            code: code.map(str::to_string),
            permanent_number: None,
            constructor: None,
        }
    }

    #[test]
    fn test_display_code_prefers_short_code() {
        assert_eq!(entrant(Some("VER")).display_code(), "VER");
        assert_eq!(entrant(Some("VER")).label(), "Max Verstappen (VER)");
    }

    #[test]
    fn test_display_code_falls_back_to_driver_id() {
        assert_eq!(entrant(None).display_code(), "max_verstappen");
        assert_eq!(entrant(Some("  ")).display_code(), "max_verstappen");
        assert_eq!(entrant(None).label(), "Max Verstappen (max_verstappen)");
    }

    #[test]
    fn test_best_time() {
        let mut result = QualifyingResult {
            driver_id: "norris".to_string(),
            position: 1,
            q1: Some("1:15.912".to_string()),
            q2: Some("1:15.415".to_string()),
            q3: None,
        };
        assert_eq!(result.best_time(), Some("1:15.415"));

        result.q3 = Some("1:15.096".to_string());
        assert_eq!(result.best_time(), Some("1:15.096"));

        result.q1 = None;
        result.q2 = None;
        result.q3 = None;
        assert_eq!(result.best_time(), None);
    }

    #[test]
    fn test_race_label() {
        let race = Race {
            season: 2025,
            round: 1,
            name: "Australian Grand Prix".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
            time: None,
            circuit_name: "Albert Park Grand Prix Circuit".to_string(),
            locality: Some("Melbourne".to_string()),
            country: "Australia".to_string(),
        };
        assert_eq!(race.label(), "Australian Grand Prix (2025-03-16)");
        assert_eq!(race.key(), (2025, 1));
    }
}
