//! Linear (plate carrée) projection: longitude and latitude in degrees are
//! used directly as plane coordinates.

use crate::transform::{valid_geographic, MapProjection};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateCarree {
    /// Longitude mapped to `x = 0`, degrees
    pub central_longitude: f64,
}

impl PlateCarree {
    pub fn new(central_longitude: f64) -> Self {
        Self { central_longitude }
    }
}

impl MapProjection for PlateCarree {
    fn forward(&self, lat: f64, lon: f64) -> Option<(f64, f64)> {
        if !valid_geographic(lat, lon) {
            return None;
        }
        Some((lon - self.central_longitude, lat))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !(-90.0..=90.0).contains(&y) {
            return None;
        }
        Some((y, x + self.central_longitude))
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

    #[test]
    fn test_identity_in_degrees() {
        let proj = PlateCarree::new(0.0);
        assert_eq!(proj.forward(-45.0, 120.0), Some((120.0, -45.0)));
        assert_eq!(proj.inverse(120.0, -45.0), Some((-45.0, 120.0)));
    }

    #[test]
    fn test_longitudes_are_not_wrapped() {
        // Callers unwrap cell longitudes; the projection keeps them contiguous.
        let proj = PlateCarree::new(180.0);
        assert_eq!(proj.forward(0.0, 190.0), Some((10.0, 0.0)));
        assert_eq!(proj.forward(0.0, -170.0), Some((-350.0, 0.0)));
    }

    #[test]
    fn test_rejects_invalid_latitude() {
        let proj = PlateCarree::new(0.0);
        assert!(proj.forward(91.0, 0.0).is_none());
        assert!(proj.forward(f64::NAN, 0.0).is_none());
    }
}
