use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Club;
use crate::error::{CoreError, CoreResult};

/// Meters to yards. Shots are stored in meters and shown in yards.
pub const METERS_TO_YARDS: f64 = 1.09361;

/// One recorded stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub club: Club,
    pub distance_meters: f64,
}

impl Shot {
    pub fn new(club: Club, distance_meters: f64) -> CoreResult<Self> {
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(CoreError::InvalidDistance(distance_meters));
        }
        Ok(Self {
            club,
            distance_meters,
        })
    }

    /// Build a shot from a yardage, as persisted aggregates are kept in yards.
    pub fn from_yards(club: Club, yards: f64) -> CoreResult<Self> {
        Self::new(club, yards / METERS_TO_YARDS)
    }

    pub fn distance_yards(&self) -> f64 {
        self.distance_meters * METERS_TO_YARDS
    }
}

/// Group shots by club, yielding yardages in recording order.
pub fn aggregate_by_club(shots: &[Shot]) -> BTreeMap<Club, Vec<f64>> {
    let mut grouped: BTreeMap<Club, Vec<f64>> = BTreeMap::new();
    for shot in shots {
        grouped
            .entry(shot.club.clone())
            .or_default()
            .push(shot.distance_yards());
    }
    grouped
}
