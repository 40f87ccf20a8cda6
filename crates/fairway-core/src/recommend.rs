//! Club recommendation from recorded shot distances.
//!
//! Shots are grouped by club, averaged in yards, and the club whose average
//! is closest to the target wins. Clubs are visited in name order and only a
//! strictly smaller gap replaces the current pick, so ties always go to the
//! alphabetically first club.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{aggregate_by_club, Club, Shot};

/// A club pick together with the average it was chosen on.
#[derive(Debug, Clone, PartialEq)]
pub struct ClubChoice {
    pub club: Club,
    pub average_yards: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Club(ClubChoice),
    NoRecommendation,
}

impl Recommendation {
    pub fn club(&self) -> Option<&Club> {
        match self {
            Recommendation::Club(choice) => Some(&choice.club),
            Recommendation::NoRecommendation => None,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Club(choice) => write!(f, "{}", choice.club),
            Recommendation::NoRecommendation => write!(f, "No recommendation"),
        }
    }
}

/// Mean yardage per club.
pub fn club_averages(shots: &[Shot]) -> BTreeMap<Club, f64> {
    aggregate_by_club(shots)
        .into_iter()
        .map(|(club, yards)| {
            let mean = yards.iter().sum::<f64>() / yards.len() as f64;
            (club, mean)
        })
        .collect()
}

/// Pick the club whose average carry is nearest `target_yards`.
pub fn recommend(shots: &[Shot], target_yards: f64) -> Recommendation {
    let mut best: Option<(ClubChoice, f64)> = None;

    for (club, average_yards) in club_averages(shots) {
        let gap = (average_yards - target_yards).abs();
        let better = match &best {
            Some((_, best_gap)) => gap < *best_gap,
            None => true,
        };
        if better {
            best = Some((ClubChoice { club, average_yards }, gap));
        }
    }

    match best {
        Some((choice, _)) => Recommendation::Club(choice),
        None => Recommendation::NoRecommendation,
    }
}
