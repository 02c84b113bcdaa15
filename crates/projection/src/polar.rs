//! Polar stereographic projection on the unit sphere.
//!
//! The projection plane touches the sphere at the pole of the chosen
//! hemisphere. Points further than [`DEFAULT_MAX_COLATITUDE`] from that pole
//! are rejected; their radius grows without bound towards the opposite pole.

use std::fmt;
use std::str::FromStr;

use crate::error::ProjectionError;
use crate::transform::{valid_geographic, MapProjection};

/// Largest angular distance from the tangent pole that still projects, degrees.
pub const DEFAULT_MAX_COLATITUDE: f64 = 135.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Hemisphere containing `lat`. The equator counts as north.
    pub fn from_latitude(lat: f64) -> Self {
        if lat < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::North => "north",
            Hemisphere::South => "south",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hemisphere {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" | "nh" => Ok(Hemisphere::North),
            "s" | "south" | "sh" => Ok(Hemisphere::South),
            other => Err(ProjectionError::InvalidParameter {
                param: "hemisphere",
                message: format!("expected north or south, got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarStereographic {
    pub hemisphere: Hemisphere,
    /// Meridian pointing straight down (north) or up (south) from the pole
    pub central_longitude: f64,
    pub max_colatitude: f64,
}

impl PolarStereographic {
    pub fn new(hemisphere: Hemisphere, central_longitude: f64) -> Self {
        Self {
            hemisphere,
            central_longitude,
            max_colatitude: DEFAULT_MAX_COLATITUDE,
        }
    }

    pub fn south() -> Self {
        Self::new(Hemisphere::South, 0.0)
    }

    pub fn north() -> Self {
        Self::new(Hemisphere::North, 0.0)
    }

    /// Angular distance from the tangent pole, degrees.
    fn colatitude(&self, lat: f64) -> f64 {
        match self.hemisphere {
            Hemisphere::North => 90.0 - lat,
            Hemisphere::South => 90.0 + lat,
        }
    }
}

impl MapProjection for PolarStereographic {
    fn forward(&self, lat: f64, lon: f64) -> Option<(f64, f64)> {
        if !valid_geographic(lat, lon) {
            return None;
        }
        let colat = self.colatitude(lat);
        if colat > self.max_colatitude {
            return None;
        }
        let rho = 2.0 * (colat.to_radians() / 2.0).tan();
        let dlon = (lon - self.central_longitude).to_radians();
        let x = rho * dlon.sin();
        let y = match self.hemisphere {
            Hemisphere::North => -rho * dlon.cos(),
            Hemisphere::South => rho * dlon.cos(),
        };
        Some((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let rho = x.hypot(y);
        let colat = (2.0 * (rho / 2.0).atan()).to_degrees();
        let (lat, dlon) = match self.hemisphere {
            Hemisphere::North => (90.0 - colat, x.atan2(-y)),
            Hemisphere::South => (colat - 90.0, x.atan2(y)),
        };
        Some((lat, self.central_longitude + dlon.to_degrees()))
    }

    fn central_longitude(&self) -> f64 {
        self.central_longitude
    }
}
