//! Geographic coordinate (WGS84 degrees).

use geo::Coord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar coordinate used by the geometry code (x = lon, y = lat)
    pub fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Finite and within lat -90..=90, lon -180..=180
    pub fn is_valid(&self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(c: Coord<f64>) -> Self {
        Self { lat: c.y, lon: c.x }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
    #[error("expected \"lat,lon\", got {0:?}")]
    Format(String),
    #[error("invalid number {0:?}")]
    Number(String),
    #[error("coordinate out of range: {0}")]
    OutOfRange(String),
}

/// Parses `"lat,lon"` (whitespace around either part is ignored)
impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::Format(s.to_string()))?;

        let parse = |part: &str| -> Result<f64, CoordinateParseError> {
            part.trim()
                .parse::<f64>()
                .map_err(|_| CoordinateParseError::Number(part.trim().to_string()))
        };

        let coordinate = Coordinate::new(parse(lat)?, parse(lon)?);

        if !coordinate.is_valid() {
            return Err(CoordinateParseError::OutOfRange(s.trim().to_string()));
        }

        Ok(coordinate)
    }
}
