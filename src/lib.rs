//! F1 Predictor - next-race resolution and qualifying-based finish estimates
//!
//! This library provides:
//! - Race schedule, entrant and qualifying queries against the Ergast F1 API
//! - The race resolution pipeline (next race → entrants → qualifying → driver)
//! - A placeholder finishing-position estimate from qualifying position
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use f1_predictor::pipeline::{RaceResolutionPipeline, RaceTarget};
//! use f1_predictor::predictor::PlaceholderEstimator;
//! use f1_predictor::source::{ErgastClient, SourceConfig};
//! use f1_predictor::PipelineState;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = RaceResolutionPipeline::new(ErgastClient::new(SourceConfig::default())?);
//!     let today = Local::now().date_naive();
//!
//!     let state = pipeline
//!         .load(2025, RaceTarget::Next, today)
//!         .await
//!         .select_driver("max_verstappen");
//!
//!     match state {
//!         PipelineState::Ready { input, .. } => {
//!             let estimate = PlaceholderEstimator::new().estimate(&input, &mut rand::thread_rng());
//!             println!("Expected finish: P{}", estimate.expected_position);
//!         }
//!         PipelineState::Blocked(reason) => println!("{}", reason),
//!         _ => {}
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod source;

// Re-export commonly used types
pub use error::Blocked;
pub use models::{Entrant, FinishEstimate, PredictionInput, QualifyingResult, Race};
pub use pipeline::{lookup_qualifying_position, PipelineState, RaceResolutionPipeline, RaceTarget};
pub use predictor::PlaceholderEstimator;
pub use source::{CachedSource, ErgastClient, RaceSource, SourceConfig, SourceError};
