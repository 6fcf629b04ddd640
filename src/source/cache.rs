//! Session-lifetime memoization of source queries

use super::{RaceSource, SourceError};
use crate::models::{Entrant, QualifyingResult, Race};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Wraps a source and remembers every successful answer for the session.
///
/// No eviction: data for a given (season, round) does not change once
/// published. Errors are never cached, so a later call asks again.
pub struct CachedSource<S> {
    inner: S,
    schedules: Mutex<HashMap<u32, Vec<Race>>>,
    entrants: Mutex<HashMap<(u32, u32), Vec<Entrant>>>,
    qualifying: Mutex<HashMap<(u32, u32), Vec<QualifyingResult>>>,
}

impl<S: RaceSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            schedules: Mutex::new(HashMap::new()),
            entrants: Mutex::new(HashMap::new()),
            qualifying: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: RaceSource> RaceSource for CachedSource<S> {
    async fn schedule(&self, season: u32) -> Result<Vec<Race>, SourceError> {
        if let Some(hit) = self.schedules.lock().await.get(&season) {
            tracing::debug!("Schedule cache hit for {}", season);
            return Ok(hit.clone());
        }

        let races = self.inner.schedule(season).await?;
        self.schedules.lock().await.insert(season, races.clone());
        Ok(races)
    }

    async fn entrants(&self, season: u32, round: u32) -> Result<Vec<Entrant>, SourceError> {
        if let Some(hit) = self.entrants.lock().await.get(&(season, round)) {
            tracing::debug!("Entrants cache hit for {} round {}", season, round);
            return Ok(hit.clone());
        }

        let entrants = self.inner.entrants(season, round).await?;
        self.entrants
            .lock()
            .await
            .insert((season, round), entrants.clone());
        Ok(entrants)
    }

    async fn qualifying(
        &self,
        season: u32,
        round: u32,
    ) -> Result<Vec<QualifyingResult>, SourceError> {
        if let Some(hit) = self.qualifying.lock().await.get(&(season, round)) {
            tracing::debug!("Qualifying cache hit for {} round {}", season, round);
            return Ok(hit.clone());
        }

        let results = self.inner.qualifying(season, round).await?;
        self.qualifying
            .lock()
            .await
            .insert((season, round), results.clone());
        Ok(results)
    }
}
