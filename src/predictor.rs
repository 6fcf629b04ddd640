use crate::models::{FinishEstimate, PredictionInput, QualifyingResult};
use rand::Rng;

/// Lower bound of the random multiplier
const DEFAULT_LOW: f64 = 0.9;
/// Upper bound (exclusive) of the random multiplier
const DEFAULT_HIGH: f64 = 1.3;

/// Placeholder finishing-position estimate until a trained model exists.
///
/// Multiplies the qualifying position by a factor drawn uniformly from
/// `[low, high)` and rounds to one decimal.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderEstimator {
    low: f64,
    high: f64,
}

impl PlaceholderEstimator {
    pub fn new() -> Self {
        Self {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
        }
    }

    pub fn estimate<R: Rng>(&self, input: &PredictionInput, rng: &mut R) -> FinishEstimate {
        let multiplier = rng.gen_range(self.low..self.high);
        let raw = input.qualifying_position as f64 * multiplier;

        FinishEstimate {
            driver_id: input.driver_id.clone(),
            qualifying_position: input.qualifying_position,
            expected_position: round_one_decimal(raw),
        }
    }

    /// Estimates for a whole qualifying classification, in grid order
    pub fn estimate_grid<R: Rng>(
        &self,
        qualifying: &[QualifyingResult],
        rng: &mut R,
    ) -> Vec<FinishEstimate> {
        let mut grid: Vec<&QualifyingResult> = qualifying.iter().collect();
        grid.sort_by_key(|q| q.position);

        grid.into_iter()
            .map(|q| {
                let input = PredictionInput {
                    driver_id: q.driver_id.clone(),
                    qualifying_position: q.position,
                };
                self.estimate(&input, &mut *rng)
            })
            .collect()
    }
}

impl Default for PlaceholderEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
