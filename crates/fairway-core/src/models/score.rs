use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Holes in a full round.
const FULL_ROUND_HOLES: u32 = 18;

/// One recorded round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub course: String,
    pub score: f64,
    #[serde(default)]
    pub holes: Vec<u32>,
}

impl ScoreEntry {
    pub fn new(course: impl Into<String>, score: f64, holes: Vec<u32>) -> Self {
        Self {
            course: course.into(),
            score,
            holes,
        }
    }

    /// A round covering holes 1 through 18.
    pub fn full_round(course: impl Into<String>, score: f64) -> Self {
        Self::new(course, score, (1..=FULL_ROUND_HOLES).collect())
    }
}

/// Parse a typed score. Must be a finite, positive number.
pub fn parse_score(text: &str) -> CoreResult<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(score) if score.is_finite() && score > 0.0 => Ok(score),
        _ => Err(CoreError::InvalidScore(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_round_holes() {
        let entry = ScoreEntry::full_round("Minnehaha Creek", 88.0);
        assert_eq!(entry.holes.len(), 18);
        assert_eq!(entry.holes.first(), Some(&1));
        assert_eq!(entry.holes.last(), Some(&18));
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(" 85 ").unwrap(), 85.0);
        assert_eq!(parse_score("72.5").unwrap(), 72.5);
        assert!(parse_score("").is_err());
        assert!(parse_score("abc").is_err());
        assert!(parse_score("0").is_err());
        assert!(parse_score("-3").is_err());
        assert!(parse_score("inf").is_err());
    }

    #[test]
    fn test_deserialize_without_holes() {
        let entry: ScoreEntry =
            serde_json::from_str(r#"{"course":"Home","score":90.0}"#).unwrap();
        assert!(entry.holes.is_empty());
        assert_eq!(entry.score, 90.0);
    }
}
