//! Typed coordinate selections.
//!
//! A selection names the coordinate axis it filters on and an inclusive
//! `[min, max]` interval, e.g. `latitude ∈ [-90, 0]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic axis a selection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Valid domain of the axis in degrees.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Axis::Latitude => (-90.0, 90.0),
            Axis::Longitude => (-360.0, 720.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive coordinate interval on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRange {
    pub axis: Axis,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("{axis} range [{min}, {max}] is not a finite interval")]
    NotFinite { axis: Axis, min: f64, max: f64 },

    #[error("{axis} range [{min}, {max}] is inverted")]
    Inverted { axis: Axis, min: f64, max: f64 },

    #[error("{axis} range [{min}, {max}] lies outside the axis domain")]
    OutOfDomain { axis: Axis, min: f64, max: f64 },

    #[error("{axis} range [{min}, {max}] selects no grid points")]
    Empty { axis: Axis, min: f64, max: f64 },
}

impl CoordinateRange {
    /// Build a validated range.
    pub fn new(axis: Axis, min: f64, max: f64) -> Result<Self, SelectionError> {
        let range = Self { axis, min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn latitude(min: f64, max: f64) -> Result<Self, SelectionError> {
        Self::new(Axis::Latitude, min, max)
    }

    pub fn longitude(min: f64, max: f64) -> Result<Self, SelectionError> {
        Self::new(Axis::Longitude, min, max)
    }

    /// Check the interval is finite, ordered, and overlaps the axis domain.
    ///
    /// Deserialized ranges bypass [`CoordinateRange::new`], so callers that
    /// read them from config should call this.
    pub fn validate(&self) -> Result<(), SelectionError> {
        let (axis, min, max) = (self.axis, self.min, self.max);
        if !min.is_finite() || !max.is_finite() {
            return Err(SelectionError::NotFinite { axis, min, max });
        }
        if min > max {
            return Err(SelectionError::Inverted { axis, min, max });
        }
        let (lo, hi) = axis.domain();
        if max < lo || min > hi {
            return Err(SelectionError::OutOfDomain { axis, min, max });
        }
        Ok(())
    }

    /// Inclusive containment test.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Error to report when the range matched nothing.
    pub fn empty_error(&self) -> SelectionError {
        SelectionError::Empty {
            axis: self.axis,
            min: self.min,
            max: self.max,
        }
    }
}

impl fmt::Display for CoordinateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=[{}, {}]", self.axis, self.min, self.max)
    }
}

/// Bring `lon` within 180° of `reference`: the result lies in
/// `(reference - 180, reference + 180]`.
///
/// Non-finite inputs come back unchanged.
pub fn unwrap_longitude(lon: f64, reference: f64) -> f64 {
    if !lon.is_finite() || !reference.is_finite() {
        return lon;
    }
    reference + 180.0 - (reference - lon + 180.0).rem_euclid(360.0)
}
