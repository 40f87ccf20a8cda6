//! GPS coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Pin used until the player drops one of their own.
pub const DEFAULT_HOLE: Coordinate = Coordinate {
    latitude: 45.099087,
    longitude: -93.518656,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoreError;

    fn try_from(raw: RawCoordinate) -> CoreResult<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> CoreResult<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() <= 90.0
            && longitude.abs() <= 180.0;
        if !valid {
            return Err(CoreError::InvalidCoordinate(format!("{}, {}", latitude, longitude)));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse from tokens such as `["45.1", "-93.5"]` or `["45.1,-93.5"]`.
    pub fn parse(tokens: &[&str]) -> CoreResult<Self> {
        let joined = tokens.join(" ");
        let parts: Vec<&str> = joined
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        match parts.as_slice() {
            [lat, lon] => {
                let latitude = lat
                    .parse::<f64>()
                    .map_err(|_| CoreError::InvalidCoordinate(joined.clone()))?;
                let longitude = lon
                    .parse::<f64>()
                    .map_err(|_| CoreError::InvalidCoordinate(joined.clone()))?;
                Self::new(latitude, longitude)
            }
            _ => Err(CoreError::InvalidCoordinate(joined)),
        }
    }

    /// Haversine distance to another point, in meters.
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }
}
