//! Lambert Conformal Conic projection.
//!
//! Maps a cone tangent or secant to the sphere onto a flat plane. Suited to
//! mid-latitude regions; the cone apex sits over the pole of the hemisphere
//! holding the standard parallels.
//!
//! The projection parameters include:
//! - Central meridian (lon0)
//! - Standard parallel(s): latin1 and latin2 (equal for a tangent cone)
//! - Reference latitude (lat0): placed at `y = 0`

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::error::{ProjectionError, ProjectionResult};
use crate::transform::{valid_geographic, MapProjection};

/// Lambert Conformal Conic projection parameters on the unit sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Reference latitude in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the reference latitude
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from degrees.
    ///
    /// # Arguments
    /// * `lon0_deg` - Central meridian
    /// * `latin1_deg` - First standard parallel
    /// * `latin2_deg` - Second standard parallel
    ///
    /// The reference latitude is the midpoint of the standard parallels.
    pub fn new(lon0_deg: f64, latin1_deg: f64, latin2_deg: f64) -> ProjectionResult<Self> {
        let parallels = [
            ("standard_parallel_1", latin1_deg),
            ("standard_parallel_2", latin2_deg),
        ];
        for (param, value) in parallels {
            if !value.is_finite() || value.abs() >= 90.0 {
                return Err(ProjectionError::InvalidParameter {
                    param,
                    message: format!("{} is not a latitude strictly between -90 and 90", value),
                });
            }
        }
        if (latin1_deg + latin2_deg).abs() < 1e-10 {
            return Err(ProjectionError::InvalidParameter {
                param: "standard_parallels",
                message: format!(
                    "{} and {} are symmetric about the equator; the cone degenerates",
                    latin1_deg, latin2_deg
                ),
            });
        }

        let lon0 = lon0_deg.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();
        let lat0 = (latin1 + latin2) / 2.0;

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((FRAC_PI_4 + latin2 / 2.0).tan() / (FRAC_PI_4 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        // Compute F constant
        let f = (latin1.cos() * (FRAC_PI_4 + latin1 / 2.0).tan().powf(n)) / n;

        // Compute rho at the reference latitude
        let rho0 = f / (FRAC_PI_4 + lat0 / 2.0).tan().powf(n);

        Ok(Self {
            lon0,
            lat0,
            latin1,
            latin2,
            n,
            f,
            rho0,
        })
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    fn rho(&self, lat: f64) -> f64 {
        self.f / (FRAC_PI_4 + lat / 2.0).tan().powf(self.n)
    }
}

impl MapProjection for LambertConformal {
    fn forward(&self, lat_deg: f64, lon_deg: f64) -> Option<(f64, f64)> {
        if !valid_geographic(lat_deg, lon_deg) {
            return None;
        }
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();

        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        // Apex of the cone is reached at the far pole
        let rho = self.rho(lat);
        if !rho.is_finite() {
            return None;
        }

        let theta = self.n * dlon;
        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        Some((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let sign = self.n.signum();
        let dy = self.rho0 - y;
        let rho = sign * (x * x + dy * dy).sqrt();
        let theta = (sign * x).atan2(sign * dy);

        let lat = if rho == 0.0 {
            sign * FRAC_PI_2
        } else {
            2.0 * (self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2
        };
        let lon = self.lon0 + theta / self.n;

        Some((lat.to_degrees(), lon.to_degrees()))
    }

    fn central_longitude(&self) -> f64 {
        self.lon0.to_degrees()
    }
}
