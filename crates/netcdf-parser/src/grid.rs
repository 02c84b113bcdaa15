//! Curvilinear grid model.
//!
//! A curvilinear grid stores a latitude and longitude for every cell center
//! (row-major, `nj` rows by `ni` columns) plus the corner coordinates of
//! every cell. Rectilinear lat/lon axes are expanded into the same model so
//! the renderer only ever sees one shape of grid.

pub use plot_common::unwrap_longitude;
use plot_common::BoundingBox;

use crate::error::{NetCdfError, NetCdfResult};

/// Half-width in degrees used when a grid axis has a single point and
/// cell edges cannot be extrapolated from neighbours.
const SINGLE_POINT_HALF_WIDTH: f64 = 0.5;

/// Cell centers and corners of a 2-D geographic grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvilinearGrid {
    nj: usize,
    ni: usize,
    lat: Vec<f64>,
    lon: Vec<f64>,
    nvert: usize,
    corner_lat: Vec<f64>,
    corner_lon: Vec<f64>,
}

impl CurvilinearGrid {
    /// Build a grid from cell centers, deriving 4-vertex cell corners from
    /// the midpoints between neighbouring centers.
    pub fn new(nj: usize, ni: usize, lat: Vec<f64>, lon: Vec<f64>) -> NetCdfResult<Self> {
        check_centers(nj, ni, &lat, &lon)?;
        let (corner_lat, corner_lon) = derive_corners(nj, ni, &lat, &lon);
        Ok(Self {
            nj,
            ni,
            lat,
            lon,
            nvert: 4,
            corner_lat,
            corner_lon,
        })
    }

    /// Build a grid with explicit corners laid out as `nj × ni × nvert`.
    pub fn with_corners(
        nj: usize,
        ni: usize,
        lat: Vec<f64>,
        lon: Vec<f64>,
        nvert: usize,
        corner_lat: Vec<f64>,
        corner_lon: Vec<f64>,
    ) -> NetCdfResult<Self> {
        check_centers(nj, ni, &lat, &lon)?;
        if nvert < 3 {
            return Err(NetCdfError::InvalidFormat(format!(
                "cells need at least 3 vertices, got {}",
                nvert
            )));
        }
        let expected = nj * ni * nvert;
        if corner_lat.len() != expected || corner_lon.len() != expected {
            return Err(NetCdfError::InvalidFormat(format!(
                "cell bounds have {} / {} values, expected {}",
                corner_lat.len(),
                corner_lon.len(),
                expected
            )));
        }
        Ok(Self {
            nj,
            ni,
            lat,
            lon,
            nvert,
            corner_lat,
            corner_lon,
        })
    }

    /// Expand 1-D latitude and longitude axes into a curvilinear grid.
    pub fn rectilinear(lat_axis: &[f64], lon_axis: &[f64]) -> NetCdfResult<Self> {
        let nj = lat_axis.len();
        let ni = lon_axis.len();
        let mut lat = Vec::with_capacity(nj * ni);
        let mut lon = Vec::with_capacity(nj * ni);
        for &la in lat_axis {
            for &lo in lon_axis {
                lat.push(la);
                lon.push(lo);
            }
        }
        Self::new(nj, ni, lat, lon)
    }

    /// Number of rows.
    pub fn nj(&self) -> usize {
        self.nj
    }

    /// Number of columns.
    pub fn ni(&self) -> usize {
        self.ni
    }

    /// `(nj, ni)`
    pub fn shape(&self) -> (usize, usize) {
        (self.nj, self.ni)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.nj * self.ni
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vertices per cell.
    pub fn nvert(&self) -> usize {
        self.nvert
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.lat
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.lon
    }

    /// Center `(lat, lon)` of cell `(j, i)`.
    pub fn center(&self, j: usize, i: usize) -> (f64, f64) {
        let idx = j * self.ni + i;
        (self.lat[idx], self.lon[idx])
    }

    /// Corner `(lat, lon)` pairs of the cell at flat index `idx`.
    pub fn cell_corners(&self, idx: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        let start = idx * self.nvert;
        let end = start + self.nvert;
        self.corner_lat[start..end]
            .iter()
            .copied()
            .zip(self.corner_lon[start..end].iter().copied())
    }

    /// Geographic extent of the cell centers (x = longitude, y = latitude).
    pub fn extent(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.lon.iter().copied().zip(self.lat.iter().copied()))
    }

    /// Mean of the finite center latitudes.
    pub fn mean_latitude(&self) -> Option<f64> {
        let (sum, count) = self
            .lat
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Copy out the inclusive index window `[j0, j1] × [i0, i1]`.
    pub fn window(&self, j0: usize, j1: usize, i0: usize, i1: usize) -> NetCdfResult<Self> {
        if j0 > j1 || i0 > i1 || j1 >= self.nj || i1 >= self.ni {
            return Err(NetCdfError::InvalidFormat(format!(
                "window [{}..={}]x[{}..={}] outside grid {}x{}",
                j0, j1, i0, i1, self.nj, self.ni
            )));
        }
        let nj = j1 - j0 + 1;
        let ni = i1 - i0 + 1;
        let mut lat = Vec::with_capacity(nj * ni);
        let mut lon = Vec::with_capacity(nj * ni);
        let mut corner_lat = Vec::with_capacity(nj * ni * self.nvert);
        let mut corner_lon = Vec::with_capacity(nj * ni * self.nvert);

        for j in j0..=j1 {
            for i in i0..=i1 {
                let idx = j * self.ni + i;
                lat.push(self.lat[idx]);
                lon.push(self.lon[idx]);
                let start = idx * self.nvert;
                corner_lat.extend_from_slice(&self.corner_lat[start..start + self.nvert]);
                corner_lon.extend_from_slice(&self.corner_lon[start..start + self.nvert]);
            }
        }

        Ok(Self {
            nj,
            ni,
            lat,
            lon,
            nvert: self.nvert,
            corner_lat,
            corner_lon,
        })
    }
}

fn check_centers(nj: usize, ni: usize, lat: &[f64], lon: &[f64]) -> NetCdfResult<()> {
    if nj == 0 || ni == 0 {
        return Err(NetCdfError::InvalidFormat(format!(
            "grid has an empty dimension ({}x{})",
            nj, ni
        )));
    }
    if lat.len() != nj * ni || lon.len() != nj * ni {
        return Err(NetCdfError::InvalidFormat(format!(
            "grid {}x{} needs {} centers, got {} lat / {} lon",
            nj,
            ni,
            nj * ni,
            lat.len(),
            lon.len()
        )));
    }
    Ok(())
}

fn is_finite_point((lat, lon): (f64, f64)) -> bool {
    lat.is_finite() && lon.is_finite()
}

/// Reflect `edge` away from `inner`: `edge + (edge - inner)`.
///
/// A missing `inner` leaves the edge where it is; a missing `edge` stays missing.
fn extrapolate(edge: (f64, f64), inner: (f64, f64)) -> (f64, f64) {
    if !is_finite_point(edge) {
        return (f64::NAN, f64::NAN);
    }
    if !is_finite_point(inner) {
        return edge;
    }
    let inner_lon = unwrap_longitude(inner.1, edge.1);
    (
        (2.0 * edge.0 - inner.0).clamp(-90.0, 90.0),
        2.0 * edge.1 - inner_lon,
    )
}

/// Derive 4-vertex cell corners from cell centers.
///
/// Centers are padded by one ring of linearly extrapolated points, then each
/// grid node is the mean of the finite padded centers around it (`NaN` when
/// all four are missing). Corners are
/// emitted counter-clockwise in index space: (j,i), (j,i+1), (j+1,i+1), (j+1,i).
fn derive_corners(nj: usize, ni: usize, lat: &[f64], lon: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let pw = ni + 2;
    let ph = nj + 2;
    let mut padded = vec![(0.0f64, 0.0f64); pw * ph];

    for j in 0..nj {
        for i in 0..ni {
            let idx = j * ni + i;
            padded[(j + 1) * pw + (i + 1)] = (lat[idx], lon[idx]);
        }
    }

    // Left and right columns of every interior row.
    for j in 1..=nj {
        let row = j * pw;
        let (left, right) = if ni > 1 {
            (
                extrapolate(padded[row + 1], padded[row + 2]),
                extrapolate(padded[row + ni], padded[row + ni - 1]),
            )
        } else {
            let (la, lo) = padded[row + 1];
            (
                (la, lo - SINGLE_POINT_HALF_WIDTH * 2.0),
                (la, lo + SINGLE_POINT_HALF_WIDTH * 2.0),
            )
        };
        padded[row] = left;
        padded[row + ni + 1] = right;
    }

    // Top and bottom rows, including the padded corners.
    for i in 0..pw {
        let (top, bottom) = if nj > 1 {
            (
                extrapolate(padded[pw + i], padded[2 * pw + i]),
                extrapolate(padded[nj * pw + i], padded[(nj - 1) * pw + i]),
            )
        } else {
            let (la, lo) = padded[pw + i];
            (
                ((la - SINGLE_POINT_HALF_WIDTH * 2.0).clamp(-90.0, 90.0), lo),
                ((la + SINGLE_POINT_HALF_WIDTH * 2.0).clamp(-90.0, 90.0), lo),
            )
        };
        padded[i] = top;
        padded[(nj + 1) * pw + i] = bottom;
    }

    // Grid nodes: (nj + 1) x (ni + 1)
    let nw = ni + 1;
    let mut nodes = Vec::with_capacity((nj + 1) * nw);
    for a in 0..=nj {
        for b in 0..=ni {
            let quad = [
                padded[a * pw + b],
                padded[a * pw + b + 1],
                padded[(a + 1) * pw + b],
                padded[(a + 1) * pw + b + 1],
            ];
            let mut finite = quad.iter().copied().filter(|&p| is_finite_point(p)).peekable();
            let Some(&(_, reference)) = finite.peek() else {
                nodes.push((f64::NAN, f64::NAN));
                continue;
            };
            let (sum_lat, sum_lon, count) =
                finite.fold((0.0, 0.0, 0usize), |(sl, so, n), (la, lo)| {
                    (sl + la, so + unwrap_longitude(lo, reference), n + 1)
                });
            nodes.push((sum_lat / count as f64, sum_lon / count as f64));
        }
    }

    let mut corner_lat = Vec::with_capacity(nj * ni * 4);
    let mut corner_lon = Vec::with_capacity(nj * ni * 4);
    for j in 0..nj {
        for i in 0..ni {
            for (a, b) in [(j, i), (j, i + 1), (j + 1, i + 1), (j + 1, i)] {
                let (la, lo) = nodes[a * nw + b];
                corner_lat.push(la);
                corner_lon.push(lo);
            }
        }
    }

    (corner_lat, corner_lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectilinear_corners_are_midpoints() {
        let grid = CurvilinearGrid::rectilinear(&[-10.0, 0.0, 10.0], &[0.0, 20.0]).unwrap();
        assert_eq!(grid.shape(), (3, 2));

        // Middle row, first column: center (0, 0)
        let corners: Vec<_> = grid.cell_corners(2).collect();
        assert_eq!(corners.len(), 4);
        assert_eq!(corners[0], (-5.0, -10.0));
        assert_eq!(corners[1], (-5.0, 10.0));
        assert_eq!(corners[2], (5.0, 10.0));
        assert_eq!(corners[3], (5.0, -10.0));
    }

    #[test]
    fn test_edge_corners_clamped_to_pole() {
        // Unclamped, the padded row would sit at -99.
        let grid = CurvilinearGrid::rectilinear(&[-89.0, -79.0], &[0.0, 10.0]).unwrap();
        let min_lat = (0..grid.len())
            .flat_map(|idx| grid.cell_corners(idx).map(|(la, _)| la).collect::<Vec<_>>())
            .fold(f64::INFINITY, f64::min);
        assert_eq!(min_lat, -89.5);
    }

    #[test]
    fn test_corners_across_dateline_stay_local() {
        let grid = CurvilinearGrid::rectilinear(&[0.0, 10.0], &[170.0, -170.0]).unwrap();
        for (_, lon) in grid.cell_corners(0) {
            let delta = unwrap_longitude(lon, 170.0) - 170.0;
            assert!(delta.abs() <= 10.0 + 1e-9, "corner lon {} too far", lon);
        }
    }

    #[test]
    fn test_missing_center_keeps_neighbours_drawable() {
        let lat = vec![-10.0, -10.0, -10.0, 0.0, f64::NAN, 0.0, 10.0, 10.0, 10.0];
        let lon = vec![0.0, 10.0, 20.0, 0.0, f64::NAN, 20.0, 0.0, 10.0, 20.0];
        let grid = CurvilinearGrid::new(3, 3, lat, lon).unwrap();

        for idx in 0..grid.len() {
            for (la, lo) in grid.cell_corners(idx) {
                assert!(la.is_finite() && lo.is_finite(), "cell {} corner ({}, {})", idx, la, lo);
            }
        }
        // Node shared by cells 0, 1, 3, 4 averages the three finite centers.
        let shared = grid.cell_corners(0).nth(2).unwrap();
        assert!((shared.0 - (-20.0 / 3.0)).abs() < 1e-9);
        assert!((shared.1 - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_grid() {
        let grid = CurvilinearGrid::new(1, 1, vec![-45.0], vec![30.0]).unwrap();
        let corners: Vec<_> = grid.cell_corners(0).collect();
        assert_eq!(corners[0], (-45.5, 29.5));
        assert_eq!(corners[2], (-44.5, 30.5));
    }

    #[test]
    fn test_window() {
        let grid = CurvilinearGrid::rectilinear(&[-30.0, -20.0, -10.0], &[0.0, 5.0, 10.0]).unwrap();
        let sub = grid.window(1, 2, 0, 1).unwrap();
        assert_eq!(sub.shape(), (2, 2));
        assert_eq!(sub.center(0, 0), (-20.0, 0.0));
        assert_eq!(sub.center(1, 1), (-10.0, 5.0));
        assert_eq!(
            sub.cell_corners(0).collect::<Vec<_>>(),
            grid.cell_corners(3).collect::<Vec<_>>()
        );
        assert!(grid.window(0, 3, 0, 0).is_err());
    }

    #[test]
    fn test_mismatched_centers_rejected() {
        assert!(CurvilinearGrid::new(2, 2, vec![0.0; 3], vec![0.0; 4]).is_err());
        assert!(CurvilinearGrid::new(0, 2, vec![], vec![]).is_err());
    }

    #[test]
    fn test_unwrap_longitude() {
        assert_eq!(unwrap_longitude(-170.0, 170.0), 190.0);
        assert_eq!(unwrap_longitude(350.0, 0.0), -10.0);
        assert_eq!(unwrap_longitude(10.0, 0.0), 10.0);
    }
}
