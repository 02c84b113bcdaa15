//! Test data generators for synthetic curvilinear model output.
//!
//! The grids are warped lat/lon lattices: rows and columns are not aligned
//! with parallels and meridians, which is what distinguishes a curvilinear
//! grid from a rectilinear one.

/// Shape and warp of a synthetic curvilinear grid.
#[derive(Debug, Clone, Copy)]
pub struct CurveGridSpec {
    /// Rows
    pub nj: usize,
    /// Columns
    pub ni: usize,
    /// Southernmost unwarped row edge (degrees)
    pub min_lat: f64,
    /// Northernmost unwarped row edge (degrees)
    pub max_lat: f64,
    /// Latitude warp amplitude (degrees)
    pub lat_warp: f64,
    /// Longitude warp amplitude (degrees)
    pub lon_warp: f64,
}

impl CurveGridSpec {
    /// Global grid shaped like the classic `sampleCurveGrid4.nc` test file.
    pub const fn sample() -> Self {
        Self {
            nj: 32,
            ni: 48,
            min_lat: -88.0,
            max_lat: 88.0,
            lat_warp: 3.0,
            lon_warp: 6.0,
        }
    }

    /// Small global grid for fast tests.
    pub const fn small() -> Self {
        Self {
            nj: 8,
            ni: 12,
            min_lat: -80.0,
            max_lat: 80.0,
            lat_warp: 2.0,
            lon_warp: 4.0,
        }
    }

    /// Grid confined to the northern hemisphere.
    pub const fn northern() -> Self {
        Self {
            nj: 6,
            ni: 10,
            min_lat: 20.0,
            max_lat: 80.0,
            lat_warp: 1.0,
            lon_warp: 2.0,
        }
    }

    pub fn size(&self) -> usize {
        self.nj * self.ni
    }

    /// Warped `(lat, lon)` at fractional index position `(fj, fi)`.
    ///
    /// `fj = 0` is the southern edge of the first row and `fj = nj` the
    /// northern edge of the last; likewise for `fi` in longitude.
    pub fn position(&self, fj: f64, fi: f64) -> (f64, f64) {
        let base_lat = self.min_lat + (self.max_lat - self.min_lat) * fj / self.nj as f64;
        let base_lon = 360.0 * fi / self.ni as f64;
        let lat = base_lat
            + self.lat_warp * (2.0 * base_lon.to_radians()).sin() * base_lat.to_radians().cos();
        let lon = base_lon + self.lon_warp * base_lat.to_radians().sin();
        (lat.clamp(-89.9, 89.9), lon)
    }
}

/// Cell-center latitudes and longitudes, row-major `nj × ni`.
pub fn create_curvilinear_centers(spec: &CurveGridSpec) -> (Vec<f64>, Vec<f64>) {
    let mut lat = Vec::with_capacity(spec.size());
    let mut lon = Vec::with_capacity(spec.size());
    for j in 0..spec.nj {
        for i in 0..spec.ni {
            let (la, lo) = spec.position(j as f64 + 0.5, i as f64 + 0.5);
            lat.push(la);
            lon.push(lo);
        }
    }
    (lat, lon)
}

/// Cell corners, row-major `nj × ni × 4`, counter-clockwise in index space.
pub fn create_curvilinear_corners(spec: &CurveGridSpec) -> (Vec<f64>, Vec<f64>) {
    let mut lat = Vec::with_capacity(spec.size() * 4);
    let mut lon = Vec::with_capacity(spec.size() * 4);
    for j in 0..spec.nj {
        for i in 0..spec.ni {
            let (fj, fi) = (j as f64, i as f64);
            for (dj, di) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)] {
                let (la, lo) = spec.position(fj + dj, fi + di);
                lat.push(la);
                lon.push(lo);
            }
        }
    }
    (lat, lon)
}

/// Smooth field over the sphere: a zonal gradient plus a wave-3 pattern.
///
/// Values fall in roughly `[-10, 30]`.
pub fn create_sample_values(lat: &[f64], lon: &[f64]) -> Vec<f64> {
    lat.iter()
        .zip(lon)
        .map(|(&la, &lo)| {
            let zonal = 30.0 * la.to_radians().cos() - 5.0;
            let wave = 5.0 * (3.0 * lo.to_radians()).sin() * la.to_radians().cos();
            zonal + wave
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_grid_has_both_hemispheres() {
        let (lat, _) = create_curvilinear_centers(&CurveGridSpec::sample());
        assert_eq!(lat.len(), 32 * 48);
        assert!(lat.iter().any(|&l| l < 0.0));
        assert!(lat.iter().any(|&l| l > 0.0));
    }

    #[test]
    fn test_rows_are_not_parallels() {
        let spec = CurveGridSpec::small();
        let (lat, _) = create_curvilinear_centers(&spec);
        let row: Vec<f64> = lat[spec.ni..2 * spec.ni].to_vec();
        let spread = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - row.iter().cloned().fold(f64::INFINITY, f64::min);
        assert!(spread > 0.5, "row latitude spread {} too small", spread);
    }

    #[test]
    fn test_corners_surround_center() {
        let spec = CurveGridSpec::small();
        let (clat, _) = create_curvilinear_centers(&spec);
        let (lat, _) = create_curvilinear_corners(&spec);
        let idx = 3 * spec.ni + 4;
        let corners = &lat[idx * 4..idx * 4 + 4];
        let lo = corners.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(clat[idx] > lo && clat[idx] < hi);
    }

    #[test]
    fn test_sample_values_are_finite() {
        let (lat, lon) = create_curvilinear_centers(&CurveGridSpec::sample());
        let values = create_sample_values(&lat, &lon);
        assert!(values.iter().all(|v| v.is_finite()));
    }
}
