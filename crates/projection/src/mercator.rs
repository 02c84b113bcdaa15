//! Spherical Mercator projection on the unit sphere.

use std::f64::consts::FRAC_PI_4;

use crate::transform::{valid_geographic, MapProjection};

/// Latitudes are clamped to this value before projecting, degrees.
pub const DEFAULT_MAX_LATITUDE: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    pub central_longitude: f64,
    pub max_latitude: f64,
}

impl Mercator {
    pub fn new(central_longitude: f64) -> Self {
        Self {
            central_longitude,
            max_latitude: DEFAULT_MAX_LATITUDE,
        }
    }
}

impl MapProjection for Mercator {
    fn forward(&self, lat: f64, lon: f64) -> Option<(f64, f64)> {
        if !valid_geographic(lat, lon) {
            return None;
        }
        let phi = lat.clamp(-self.max_latitude, self.max_latitude).to_radians();
        let x = (lon - self.central_longitude).to_radians();
        let y = (FRAC_PI_4 + phi / 2.0).tan().ln();
        Some((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let lat = (2.0 * y.exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
        let lon = x.to_degrees() + self.central_longitude;
        Some((lat, lon))
    }

    fn central_longitude(&self) -> f64 {
        self.central_longitude
    }

    fn is_cylindrical(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_origin() {
        let proj = Mercator::new(0.0);
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert_approx_eq!(x, 0.0, 1e-12);
        assert_approx_eq!(y, 0.0, 1e-12);
    }

    #[test]
    fn test_poles_are_clamped() {
        let proj = Mercator::new(0.0);
        let (_, y_clamped) = proj.forward(-89.0, 0.0).unwrap();
        let (_, y_limit) = proj.forward(-85.0, 0.0).unwrap();
        assert_eq!(y_clamped, y_limit);
        assert!(proj.forward(-90.0, 0.0).unwrap().1.is_finite());
    }

    #[test]
    fn test_roundtrip() {
        let proj = Mercator::new(-30.0);
        let (x, y) = proj.forward(-42.5, 17.0).unwrap();
        let (lat, lon) = proj.inverse(x, y).unwrap();
        assert_approx_eq!(lat, -42.5, 1e-9);
        assert_approx_eq!(lon, 17.0, 1e-9);
    }
}
