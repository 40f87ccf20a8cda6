//! Differential-based handicap index.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::ScoreEntry;

/// Rounds needed before a handicap is reported.
pub const MIN_ROUNDS: usize = 3;

/// Lowest differentials averaged into the index, regardless of round count.
pub const COUNTED_ROUNDS: usize = 3;

/// "Bonus for excellence" applied to the averaged differentials.
pub const HANDICAP_MULTIPLIER: f64 = 0.96;

/// Slope of a course of standard difficulty.
pub const STANDARD_SLOPE: f64 = 113.0;

const DEFAULT_COURSE_RATING: f64 = 72.0;

/// Course difficulty inputs. Applied uniformly to every round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRatings")]
pub struct RatingConfig {
    course_rating: f64,
    slope_rating: f64,
}

#[derive(Deserialize)]
struct RawRatings {
    #[serde(default = "default_course_rating")]
    course_rating: f64,
    #[serde(default = "default_slope_rating")]
    slope_rating: f64,
}

fn default_course_rating() -> f64 {
    DEFAULT_COURSE_RATING
}

fn default_slope_rating() -> f64 {
    STANDARD_SLOPE
}

impl RatingConfig {
    /// The slope divides every differential, so it must be finite and positive.
    pub fn new(course_rating: f64, slope_rating: f64) -> CoreResult<Self> {
        if !course_rating.is_finite() {
            return Err(CoreError::InvalidRating(format!(
                "course rating {}",
                course_rating
            )));
        }
        if !slope_rating.is_finite() || slope_rating <= 0.0 {
            return Err(CoreError::InvalidRating(format!("slope rating {}", slope_rating)));
        }
        Ok(Self {
            course_rating,
            slope_rating,
        })
    }

    pub fn course_rating(&self) -> f64 {
        self.course_rating
    }

    pub fn slope_rating(&self) -> f64 {
        self.slope_rating
    }
}

impl TryFrom<RawRatings> for RatingConfig {
    type Error = CoreError;

    fn try_from(raw: RawRatings) -> CoreResult<Self> {
        Self::new(raw.course_rating, raw.slope_rating)
    }
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            course_rating: DEFAULT_COURSE_RATING,
            slope_rating: STANDARD_SLOPE,
        }
    }
}

/// Score differential for a single round.
pub fn differential(score: f64, ratings: &RatingConfig) -> f64 {
    (score - ratings.course_rating) * STANDARD_SLOPE / ratings.slope_rating
}

/// Average of the three lowest differentials, times 0.96.
/// Unrounded; display code rounds to one decimal.
pub fn compute_handicap(scores: &[ScoreEntry], ratings: &RatingConfig) -> CoreResult<f64> {
    if scores.len() < MIN_ROUNDS {
        return Err(CoreError::InsufficientData {
            remaining: MIN_ROUNDS - scores.len(),
        });
    }

    let mut differentials: Vec<f64> = scores
        .iter()
        .map(|entry| differential(entry.score, ratings))
        .collect();
    differentials.sort_by(|a, b| a.total_cmp(b));

    let lowest = &differentials[..COUNTED_ROUNDS];
    let average = lowest.iter().sum::<f64>() / lowest.len() as f64;
    Ok(average * HANDICAP_MULTIPLIER)
}
