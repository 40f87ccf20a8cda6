//! Display strings for distances, recommendations and handicaps.

use crate::error::{CoreError, CoreResult};
use crate::recommend::Recommendation;

/// Label for a distance already converted to yards
pub fn distance_label(yards: f64) -> String {
    format!("Distance: {:.1} yards", yards)
}

pub fn recommendation_label(recommendation: &Recommendation) -> String {
    format!("Recommendation: {}", recommendation)
}

/// Handicap rounded to one decimal, or what is missing to compute one
pub fn handicap_label(result: &CoreResult<f64>) -> String {
    match result {
        Ok(handicap) => format!("Handicap: {:.1}", handicap),
        Err(CoreError::InsufficientData { remaining }) => {
            format!("Handicap: Need {} more scores", remaining)
        }
        Err(CoreError::InvalidScore(_)) => "Handicap: Invalid score".to_string(),
        Err(e) => format!("Handicap: {}", e),
    }
}
