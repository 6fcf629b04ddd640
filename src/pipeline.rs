//! Race selection and data resolution
//!
//! Resolves the target race of a season, then its entrants and qualifying
//! classification, stopping at the first stage that has nothing to offer.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Blocked;
use crate::models::{Entrant, PredictionInput, QualifyingResult, Race};
use crate::source::RaceSource;

/// Which race of the season to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceTarget {
    /// First race on or after the evaluation date
    Next,
    /// A round picked by the user, regardless of its date
    Round(u32),
}

/// Session state, advanced one stage at a time
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Unresolved,
    RaceSelected {
        race: Race,
    },
    EntrantsLoaded {
        race: Race,
        entrants: Vec<Entrant>,
    },
    QualifyingLoaded {
        race: Race,
        entrants: Vec<Entrant>,
        qualifying: Vec<QualifyingResult>,
    },
    Ready {
        race: Race,
        entrant: Entrant,
        input: PredictionInput,
    },
    Blocked(Blocked),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Unresolved => "Unresolved",
            PipelineState::RaceSelected { .. } => "RaceSelected",
            PipelineState::EntrantsLoaded { .. } => "EntrantsLoaded",
            PipelineState::QualifyingLoaded { .. } => "QualifyingLoaded",
            PipelineState::Ready { .. } => "Ready",
            PipelineState::Blocked(_) => "Blocked",
        }
    }

    /// Race resolved so far, if any
    pub fn race(&self) -> Option<&Race> {
        match self {
            PipelineState::RaceSelected { race }
            | PipelineState::EntrantsLoaded { race, .. }
            | PipelineState::QualifyingLoaded { race, .. }
            | PipelineState::Ready { race, .. } => Some(race),
            PipelineState::Unresolved | PipelineState::Blocked(_) => None,
        }
    }

    pub fn blocked(&self) -> Option<&Blocked> {
        match self {
            PipelineState::Blocked(reason) => Some(reason),
            _ => None,
        }
    }

    /// Pick a driver once qualifying is loaded.
    ///
    /// `QualifyingLoaded` moves to `Ready` or `Blocked`; any other state is
    /// returned unchanged.
    pub fn select_driver(self, driver_id: &str) -> PipelineState {
        let (race, entrants, qualifying) = match self {
            PipelineState::QualifyingLoaded {
                race,
                entrants,
                qualifying,
            } => (race, entrants, qualifying),
            other => return other,
        };

        let Some(entrant) = entrants.into_iter().find(|e| e.driver_id == driver_id) else {
            return PipelineState::Blocked(Blocked::UnknownEntrant {
                driver_id: driver_id.to_string(),
            });
        };

        match lookup_qualifying_position(&qualifying, driver_id) {
            Ok(position) => {
                debug!("{} qualified P{}", driver_id, position);
                PipelineState::Ready {
                    race,
                    entrant,
                    input: PredictionInput {
                        driver_id: driver_id.to_string(),
                        qualifying_position: position,
                    },
                }
            }
            Err(reason) => PipelineState::Blocked(reason),
        }
    }
}

/// Qualifying position of `driver_id`, total over any input
pub fn lookup_qualifying_position(
    results: &[QualifyingResult],
    driver_id: &str,
) -> Result<u32, Blocked> {
    results
        .iter()
        .find(|r| r.driver_id == driver_id)
        .map(|r| r.position)
        .ok_or_else(|| Blocked::DriverHasNoQualifyingResult {
            driver_id: driver_id.to_string(),
        })
}

/// First race dated on or after `today`, earliest (date, round) wins
pub fn next_race(races: &[Race], today: NaiveDate) -> Option<&Race> {
    races
        .iter()
        .filter(|r| r.date >= today)
        .min_by_key(|r| (r.date, r.round))
}

/// Resolves a race and its data against a [`RaceSource`]
pub struct RaceResolutionPipeline<S> {
    source: S,
}

impl<S: RaceSource> RaceResolutionPipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Full schedule of the season; an empty schedule counts as unavailable
    pub async fn schedule(&self, season: u32) -> Result<Vec<Race>, Blocked> {
        let races = self.source.schedule(season).await?;
        if races.is_empty() {
            return Err(Blocked::SourceUnavailable {
                reason: format!("empty schedule for season {}", season),
            });
        }
        Ok(races)
    }

    /// Next race on or after the evaluation date
    pub async fn resolve_next_race(&self, season: u32, today: NaiveDate) -> Result<Race, Blocked> {
        let races = self.schedule(season).await?;
        match next_race(&races, today) {
            Some(race) => {
                info!("Next race: {} round {} on {}", race.name, race.round, race.date);
                Ok(race.clone())
            }
            None => Err(Blocked::NoUpcomingRace { season }),
        }
    }

    /// Race chosen explicitly by round, past or future
    pub async fn select_race(&self, season: u32, round: u32) -> Result<Race, Blocked> {
        let races = self.schedule(season).await?;
        races
            .into_iter()
            .find(|r| r.round == round)
            .ok_or(Blocked::RaceNotFound { season, round })
    }

    pub async fn resolve_entrants(&self, season: u32, round: u32) -> Result<Vec<Entrant>, Blocked> {
        let entrants = self.source.entrants(season, round).await?;
        if entrants.is_empty() {
            return Err(Blocked::EntrantsUnavailable { season, round });
        }
        debug!("{} entrants for {} round {}", entrants.len(), season, round);
        Ok(entrants)
    }

    pub async fn resolve_qualifying(
        &self,
        season: u32,
        round: u32,
    ) -> Result<Vec<QualifyingResult>, Blocked> {
        let results = self.source.qualifying(season, round).await?;
        if results.is_empty() {
            return Err(Blocked::QualifyingUnavailable { season, round });
        }
        debug!(
            "{} qualifying results for {} round {}",
            results.len(),
            season,
            round
        );
        Ok(results)
    }

    /// Run from `Unresolved` up to `QualifyingLoaded`, or the first `Blocked`
    pub async fn load(&self, season: u32, target: RaceTarget, today: NaiveDate) -> PipelineState {
        let mut state = PipelineState::Unresolved;
        loop {
            let next = self.advance(state, season, target, today).await;
            debug!("Pipeline state: {}", next.name());

            match next {
                PipelineState::QualifyingLoaded { .. } | PipelineState::Ready { .. } => {
                    return next
                }
                PipelineState::Blocked(ref reason) => {
                    info!("Pipeline blocked: {}", reason);
                    return next;
                }
                _ => state = next,
            }
        }
    }

    /// One forward transition
    async fn advance(
        &self,
        state: PipelineState,
        season: u32,
        target: RaceTarget,
        today: NaiveDate,
    ) -> PipelineState {
        let result = match state {
            PipelineState::Unresolved => {
                let race = match target {
                    RaceTarget::Next => self.resolve_next_race(season, today).await,
                    RaceTarget::Round(round) => self.select_race(season, round).await,
                };
                race.map(|race| PipelineState::RaceSelected { race })
            }
            PipelineState::RaceSelected { race } => self
                .resolve_entrants(race.season, race.round)
                .await
                .map(|entrants| PipelineState::EntrantsLoaded { race, entrants }),
            PipelineState::EntrantsLoaded { race, entrants } => self
                .resolve_qualifying(race.season, race.round)
                .await
                .map(|qualifying| PipelineState::QualifyingLoaded {
                    race,
                    entrants,
                    qualifying,
                }),
            terminal => Ok(terminal),
        };

        result.unwrap_or_else(PipelineState::Blocked)
    }
}
