//! In-memory grid variables and coordinate subsetting.

use plot_common::{Axis, CoordinateRange};
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};
use crate::grid::{unwrap_longitude, CurvilinearGrid};

/// A 2-D field on a curvilinear grid. Missing values are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridVariable {
    pub name: String,
    pub units: Option<String>,
    pub long_name: Option<String>,
    pub values: Vec<f64>,
    pub grid: CurvilinearGrid,
}

impl GridVariable {
    pub fn new(
        name: impl Into<String>,
        values: Vec<f64>,
        grid: CurvilinearGrid,
    ) -> NetCdfResult<Self> {
        if values.len() != grid.len() {
            return Err(NetCdfError::InvalidFormat(format!(
                "{} values for a {}x{} grid",
                values.len(),
                grid.nj(),
                grid.ni()
            )));
        }
        Ok(Self {
            name: name.into(),
            units: None,
            long_name: None,
            values,
            grid,
        })
    }

    /// `(nj, ni)`
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// Number of non-missing values.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Minimum and maximum over non-missing values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Restrict the variable to cells whose centers satisfy every range.
    ///
    /// The result covers the smallest index window holding all matching
    /// cells; cells inside that window that fail a range are masked.
    pub fn select(&self, selections: &[CoordinateRange]) -> NetCdfResult<GridVariable> {
        if selections.is_empty() {
            return Ok(self.clone());
        }
        for range in selections {
            range.validate()?;
        }

        let (nj, ni) = self.grid.shape();
        let mut inside = vec![false; nj * ni];
        let mut window: Option<(usize, usize, usize, usize)> = None;

        for j in 0..nj {
            for i in 0..ni {
                let (lat, lon) = self.grid.center(j, i);
                if !selections.iter().all(|r| center_matches(r, lat, lon)) {
                    continue;
                }
                inside[j * ni + i] = true;
                window = Some(match window {
                    None => (j, j, i, i),
                    Some((j0, j1, i0, i1)) => (j0.min(j), j1.max(j), i0.min(i), i1.max(i)),
                });
            }
        }

        let Some((j0, j1, i0, i1)) = window else {
            return Err(self.empty_selection_error(selections).into());
        };

        let grid = self.grid.window(j0, j1, i0, i1)?;
        let mut values = Vec::with_capacity(grid.len());
        let mut masked = 0usize;
        for j in j0..=j1 {
            for i in i0..=i1 {
                let idx = j * ni + i;
                if inside[idx] {
                    values.push(self.values[idx]);
                } else {
                    masked += 1;
                    values.push(f64::NAN);
                }
            }
        }

        debug!(
            variable = %self.name,
            rows = %format!("{}..={}", j0, j1),
            cols = %format!("{}..={}", i0, i1),
            masked = masked,
            "Applied coordinate selection"
        );

        Ok(GridVariable {
            name: self.name.clone(),
            units: self.units.clone(),
            long_name: self.long_name.clone(),
            values,
            grid,
        })
    }

    /// Pick the range to blame when nothing matched: the first range that
    /// matches nothing on its own, else the first range.
    fn empty_selection_error(&self, selections: &[CoordinateRange]) -> plot_common::SelectionError {
        let lats = self.grid.latitudes();
        let lons = self.grid.longitudes();
        selections
            .iter()
            .find(|r| {
                !lats
                    .iter()
                    .zip(lons)
                    .any(|(&lat, &lon)| center_matches(r, lat, lon))
            })
            .unwrap_or(&selections[0])
            .empty_error()
    }
}

fn center_matches(range: &CoordinateRange, lat: f64, lon: f64) -> bool {
    match range.axis {
        Axis::Latitude => range.contains(lat),
        Axis::Longitude => {
            // Compare in the longitude frame of the range.
            let mid = (range.min + range.max) / 2.0;
            range.contains(lon) || range.contains(unwrap_longitude(lon, mid))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plot_common::SelectionError;

    fn sample() -> GridVariable {
        let lats = [-60.0, -30.0, 0.0, 30.0, 60.0];
        let lons = [0.0, 90.0, 180.0, 270.0];
        let grid = CurvilinearGrid::rectilinear(&lats, &lons).unwrap();
        let values = (0..grid.len()).map(|v| v as f64).collect();
        GridVariable::new("sample", values, grid).unwrap()
    }

    #[test]
    fn test_select_southern_hemisphere() {
        let var = sample();
        let range = CoordinateRange::latitude(-90.0, 0.0).unwrap();
        let sub = var.select(&[range]).unwrap();
        assert_eq!(sub.shape(), (3, 4));
        assert_eq!(sub.valid_count(), 12);
        assert_eq!(sub.values[0], 0.0);
        assert_eq!(sub.values[11], 11.0);
    }

    #[test]
    fn test_select_outside_data_domain_is_empty() {
        let var = sample();
        let range = CoordinateRange::latitude(70.0, 90.0).unwrap();
        let err = var.select(&[range]).unwrap_err();
        assert!(matches!(
            err,
            NetCdfError::Selection(SelectionError::Empty { .. })
        ));
    }

    #[test]
    fn test_longitude_selection_wraps() {
        let var = sample();
        let range = CoordinateRange::longitude(-100.0, -80.0).unwrap();
        let sub = var.select(&[range]).unwrap();
        // 270 == -90
        assert_eq!(sub.shape(), (5, 1));
        assert_eq!(sub.grid.center(0, 0).1, 270.0);
    }

    #[test]
    fn test_curvilinear_selection_masks_outside_cells() {
        // Rows tilt so the latitude window is not index aligned.
        let lat = vec![-20.0, -10.0, -10.0, 0.0, 0.0, 10.0];
        let lon = vec![0.0, 10.0, 0.0, 10.0, 0.0, 10.0];
        let grid = CurvilinearGrid::new(3, 2, lat, lon).unwrap();
        let var = GridVariable::new("tilted", vec![1.0; 6], grid).unwrap();

        let range = CoordinateRange::latitude(-15.0, 5.0).unwrap();
        let sub = var.select(&[range]).unwrap();
        assert_eq!(sub.shape(), (3, 2));
        assert!(sub.values[0].is_nan());
        assert!(sub.values[5].is_nan());
        assert_eq!(sub.valid_count(), 4);
    }

    #[test]
    fn test_value_range_ignores_missing() {
        let grid = CurvilinearGrid::rectilinear(&[0.0], &[0.0, 1.0, 2.0]).unwrap();
        let var = GridVariable::new("v", vec![f64::NAN, 3.0, -1.0], grid).unwrap();
        assert_eq!(var.value_range(), Some((-1.0, 3.0)));
    }
}
