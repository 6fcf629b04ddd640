//! HTTP client for the Ergast-compatible F1 API

use super::{parse_entrants, parse_qualifying, parse_schedule, RaceSource};
use crate::models::{Entrant, QualifyingResult, Race};
use std::time::Duration;
use thiserror::Error;

/// Public mirror of the retired ergast.com API, same paths and payloads
pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// Page size large enough for a full schedule or grid
const PAGE_LIMIT: u32 = 100;

/// Source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected payload: {0}")]
    Schema(String),

    #[error("Payload is for season {} round {}, expected season {} round {}", .actual.0, .actual.1, .expected.0, .expected.1)]
    RoundMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Source configuration
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: concat!("f1-predictor/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Ergast API client, one bounded request per query and no retries
pub struct ErgastClient {
    client: reqwest::Client,
    config: SourceConfig,
}

impl ErgastClient {
    /// Create a new client with the given configuration
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Build URL for the season schedule
    fn schedule_url(&self, season: u32) -> String {
        format!("{}/{}.json?limit={}", self.base(), season, PAGE_LIMIT)
    }

    /// Build URL for a per-race endpoint ("results" or "qualifying")
    fn race_url(&self, season: u32, round: u32, endpoint: &str) -> String {
        format!(
            "{}/{}/{}/{}.json?limit={}",
            self.base(),
            season,
            round,
            endpoint,
            PAGE_LIMIT
        )
    }

    /// Fetch a JSON document as text
    async fn fetch_json(&self, url: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error(url)
            } else {
                SourceError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Request to {} failed with status {}", url, status);
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error(url)
            } else {
                SourceError::RequestFailed(e)
            }
        })
    }

    fn timeout_error(&self, url: &str) -> SourceError {
        tracing::warn!("Request to {} timed out", url);
        SourceError::Timeout {
            url: url.to_string(),
            secs: self.config.timeout_secs,
        }
    }
}

impl RaceSource for ErgastClient {
    async fn schedule(&self, season: u32) -> Result<Vec<Race>, SourceError> {
        let url = self.schedule_url(season);
        tracing::info!("Fetching schedule: {}", url);

        let json = self.fetch_json(&url).await?;
        parse_schedule(&json, season)
    }

    async fn entrants(&self, season: u32, round: u32) -> Result<Vec<Entrant>, SourceError> {
        let url = self.race_url(season, round, "results");
        tracing::info!("Fetching entrants: {}", url);

        let json = self.fetch_json(&url).await?;
        parse_entrants(&json, season, round)
    }

    async fn qualifying(
        &self,
        season: u32,
        round: u32,
    ) -> Result<Vec<QualifyingResult>, SourceError> {
        let url = self.race_url(season, round, "qualifying");
        tracing::info!("Fetching qualifying: {}", url);

        let json = self.fetch_json(&url).await?;
        parse_qualifying(&json, season, round)
    }
}
