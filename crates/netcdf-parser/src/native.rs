//! Native NetCDF reading using the netcdf library.
//!
//! [`Dataset`] owns an open file handle; [`with_dataset`] and
//! [`load_variable`] scope that handle to a single read so it is released on
//! every exit path.

use std::path::{Path, PathBuf};
use std::sync::Once;

use plot_common::CoordinateRange;
use tracing::{debug, info, warn};

use crate::error::{NetCdfError, NetCdfResult};
use crate::grid::CurvilinearGrid;
use crate::variable::GridVariable;

/// Values at or above this magnitude are treated as missing, matching the
/// 1e20 convention of climate model output.
const MISSING_THRESHOLD: f64 = 1.0e20;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This function disables that output by calling
/// H5Eset_auto2 with null handlers. It only needs to be called once per
/// process, but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// A read-only open NetCDF file.
pub struct Dataset {
    path: PathBuf,
    file: netcdf::File,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset").field("path", &self.path).finish()
    }
}

impl Dataset {
    /// Open a NetCDF file read-only.
    ///
    /// A missing path is reported as [`NetCdfError::NotFound`] before the
    /// netcdf library is touched.
    pub fn open<P: AsRef<Path>>(path: P) -> NetCdfResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(NetCdfError::NotFound(path.to_path_buf()));
        }

        silence_hdf5_errors();

        let file = netcdf::open(path).map_err(|e| {
            NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Opened NetCDF dataset");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all variables in the file.
    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    /// Read a 2-D variable and its grid, then apply `selections`.
    pub fn read_variable(
        &self,
        name: &str,
        selections: &[CoordinateRange],
    ) -> NetCdfResult<GridVariable> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;

        let dims: Vec<(String, usize)> = var
            .dimensions()
            .iter()
            .map(|d| (d.name(), d.len()))
            .collect();
        if dims.len() < 2 {
            return Err(NetCdfError::InvalidFormat(format!(
                "{} has {} dimension(s), expected at least 2",
                name,
                dims.len()
            )));
        }

        // Leading axes (time, level) must be singletons; the trailing two are the grid.
        let (leading, trailing) = dims.split_at(dims.len() - 2);
        if let Some((dim, len)) = leading.iter().find(|(_, len)| *len != 1) {
            return Err(NetCdfError::InvalidFormat(format!(
                "{} has non-singleton leading dimension {} ({}); select a single slab first",
                name, dim, len
            )));
        }
        let (nj, ni) = (trailing[0].1, trailing[1].1);

        let grid = self.read_grid(&var, nj, ni)?;

        let raw: Vec<f64> = var
            .get_values(..)
            .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
        let values = unpack_values(&var, raw);

        let mut variable = GridVariable::new(name, values, grid)?;
        variable.units = get_str_attr(&var, "units");
        variable.long_name = get_str_attr(&var, "long_name");

        info!(
            path = %self.path.display(),
            variable = %name,
            nj = nj,
            ni = ni,
            valid = variable.valid_count(),
            "Read variable"
        );

        if selections.is_empty() {
            return Ok(variable);
        }
        let subset = variable.select(selections)?;
        info!(
            variable = %name,
            selections = %selections.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(","),
            nj = subset.shape().0,
            ni = subset.shape().1,
            valid = subset.valid_count(),
            "Selected subset"
        );
        Ok(subset)
    }

    /// Locate the latitude/longitude coordinates of `var` and build its grid.
    fn read_grid(
        &self,
        var: &netcdf::Variable,
        nj: usize,
        ni: usize,
    ) -> NetCdfResult<CurvilinearGrid> {
        let (lat_name, lon_name) = self.coordinate_names(var)?;
        let lat_var = self
            .file
            .variable(&lat_name)
            .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", lat_name)))?;
        let lon_var = self
            .file
            .variable(&lon_name)
            .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", lon_name)))?;

        let lat = read_coordinate(&lat_var)?;
        let lon = read_coordinate(&lon_var)?;
        let rank = lat_var.dimensions().len();

        match rank {
            2 => {
                if lat.len() != nj * ni || lon.len() != nj * ni {
                    return Err(NetCdfError::InvalidFormat(format!(
                        "coordinates {} / {} do not match a {}x{} grid",
                        lat_name, lon_name, nj, ni
                    )));
                }
                match self.read_curvilinear_bounds(&lat_var, &lon_var, nj, ni)? {
                    Some((nvert, corner_lat, corner_lon)) => CurvilinearGrid::with_corners(
                        nj, ni, lat, lon, nvert, corner_lat, corner_lon,
                    ),
                    None => {
                        debug!(lat = %lat_name, "No cell bounds; deriving corners from centers");
                        CurvilinearGrid::new(nj, ni, lat, lon)
                    }
                }
            }
            1 => {
                if lat.len() != nj || lon.len() != ni {
                    return Err(NetCdfError::InvalidFormat(format!(
                        "axes {}({}) / {}({}) do not match a {}x{} grid",
                        lat_name,
                        lat.len(),
                        lon_name,
                        lon.len(),
                        nj,
                        ni
                    )));
                }
                match self.read_rectilinear_bounds(&lat_var, &lon_var, nj, ni)? {
                    Some((corner_lat, corner_lon)) => {
                        let expanded = CurvilinearGrid::rectilinear(&lat, &lon)?;
                        CurvilinearGrid::with_corners(
                            nj,
                            ni,
                            expanded.latitudes().to_vec(),
                            expanded.longitudes().to_vec(),
                            4,
                            corner_lat,
                            corner_lon,
                        )
                    }
                    None => CurvilinearGrid::rectilinear(&lat, &lon),
                }
            }
            other => Err(NetCdfError::InvalidFormat(format!(
                "{} has rank {}, expected 1 or 2",
                lat_name, other
            ))),
        }
    }

    /// Names of the latitude and longitude variables attached to `var`.
    ///
    /// Looks at the CF `coordinates` attribute first, then the variable's own
    /// dimension names, then the conventional `lat`/`lon` names.
    fn coordinate_names(&self, var: &netcdf::Variable) -> NetCdfResult<(String, String)> {
        let mut candidates: Vec<String> = get_str_attr(var, "coordinates")
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        candidates.extend(var.dimensions().iter().map(|d| d.name()));
        candidates.extend(
            ["lat", "latitude", "lon", "longitude"]
                .iter()
                .map(|s| s.to_string()),
        );

        let mut lat_name = None;
        let mut lon_name = None;
        for name in candidates {
            let Some(coord) = self.file.variable(&name) else {
                continue;
            };
            match coordinate_kind(&name, &coord) {
                Some(CoordinateKind::Latitude) if lat_name.is_none() => lat_name = Some(name),
                Some(CoordinateKind::Longitude) if lon_name.is_none() => lon_name = Some(name),
                _ => {}
            }
        }

        match (lat_name, lon_name) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            (None, _) => Err(NetCdfError::MissingData(format!(
                "latitude coordinate for {}",
                var.name()
            ))),
            (_, None) => Err(NetCdfError::MissingData(format!(
                "longitude coordinate for {}",
                var.name()
            ))),
        }
    }

    /// Read `nj × ni × nvert` corner arrays named by the CF `bounds` attribute.
    fn read_curvilinear_bounds(
        &self,
        lat_var: &netcdf::Variable,
        lon_var: &netcdf::Variable,
        nj: usize,
        ni: usize,
    ) -> NetCdfResult<Option<(usize, Vec<f64>, Vec<f64>)>> {
        let (Some(lat_bounds), Some(lon_bounds)) = (
            self.bounds_variable(lat_var),
            self.bounds_variable(lon_var),
        ) else {
            return Ok(None);
        };

        let dims = lat_bounds.dimensions();
        if dims.len() != 3 {
            warn!(
                bounds = %lat_bounds.name(),
                rank = dims.len(),
                "Ignoring cell bounds with unexpected rank"
            );
            return Ok(None);
        }
        let nvert = dims[2].len();
        let corner_lat = read_coordinate(&lat_bounds)?;
        let corner_lon = read_coordinate(&lon_bounds)?;
        if corner_lat.len() != nj * ni * nvert || corner_lon.len() != nj * ni * nvert {
            warn!(
                bounds = %lat_bounds.name(),
                "Cell bounds do not match grid shape; deriving corners instead"
            );
            return Ok(None);
        }
        Ok(Some((nvert, corner_lat, corner_lon)))
    }

    /// Read `(n, 2)` axis bounds and expand them into 4-vertex cell corners.
    fn read_rectilinear_bounds(
        &self,
        lat_var: &netcdf::Variable,
        lon_var: &netcdf::Variable,
        nj: usize,
        ni: usize,
    ) -> NetCdfResult<Option<(Vec<f64>, Vec<f64>)>> {
        let (Some(lat_bounds), Some(lon_bounds)) = (
            self.bounds_variable(lat_var),
            self.bounds_variable(lon_var),
        ) else {
            return Ok(None);
        };
        let lat_b = read_coordinate(&lat_bounds)?;
        let lon_b = read_coordinate(&lon_bounds)?;
        if lat_b.len() != nj * 2 || lon_b.len() != ni * 2 {
            warn!("Axis bounds do not match grid shape; deriving corners instead");
            return Ok(None);
        }

        let mut corner_lat = Vec::with_capacity(nj * ni * 4);
        let mut corner_lon = Vec::with_capacity(nj * ni * 4);
        for j in 0..nj {
            let (la0, la1) = (lat_b[2 * j], lat_b[2 * j + 1]);
            for i in 0..ni {
                let (lo0, lo1) = (lon_b[2 * i], lon_b[2 * i + 1]);
                corner_lat.extend_from_slice(&[la0, la0, la1, la1]);
                corner_lon.extend_from_slice(&[lo0, lo1, lo1, lo0]);
            }
        }
        Ok(Some((corner_lat, corner_lon)))
    }

    fn bounds_variable(&self, coord: &netcdf::Variable) -> Option<netcdf::Variable<'_>> {
        let name = get_str_attr(coord, "bounds")?;
        self.file.variable(&name)
    }

    /// Close the file, surfacing any error the library reports on close.
    pub fn close(self) -> NetCdfResult<()> {
        let path = self.path;
        self.file.close().map_err(|e| {
            NetCdfError::InvalidFormat(format!("Failed to close {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Closed NetCDF dataset");
        Ok(())
    }
}

/// Open `path`, run `f` against it, and close the file whether or not `f`
/// succeeded. An error from `f` takes precedence over a close error.
pub fn with_dataset<P, T, F>(path: P, f: F) -> NetCdfResult<T>
where
    P: AsRef<Path>,
    F: FnOnce(&Dataset) -> NetCdfResult<T>,
{
    let dataset = Dataset::open(path)?;
    let result = f(&dataset);
    let closed = dataset.close();
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), _) => Err(err),
    }
}

/// Read one variable, restricted by `selections`, from the file at `path`.
pub fn load_variable<P: AsRef<Path>>(
    path: P,
    name: &str,
    selections: &[CoordinateRange],
) -> NetCdfResult<GridVariable> {
    with_dataset(path, |ds| ds.read_variable(name, selections))
}

// =============================================================================
// Internal helpers
// =============================================================================

enum CoordinateKind {
    Latitude,
    Longitude,
}

/// Classify a coordinate variable by its CF units / standard_name, falling
/// back to its name.
fn coordinate_kind(name: &str, var: &netcdf::Variable) -> Option<CoordinateKind> {
    let units = get_str_attr(var, "units").unwrap_or_default().to_lowercase();
    let standard = get_str_attr(var, "standard_name")
        .unwrap_or_default()
        .to_lowercase();
    let name = name.to_lowercase();

    if units.starts_with("degrees_north")
        || units.starts_with("degree_north")
        || standard == "latitude"
    {
        return Some(CoordinateKind::Latitude);
    }
    if units.starts_with("degrees_east")
        || units.starts_with("degree_east")
        || standard == "longitude"
    {
        return Some(CoordinateKind::Longitude);
    }
    if name == "lat" || name == "latitude" || name == "nav_lat" {
        return Some(CoordinateKind::Latitude);
    }
    if name == "lon" || name == "longitude" || name == "nav_lon" {
        return Some(CoordinateKind::Longitude);
    }
    None
}

fn read_f64(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    var.get_values(..).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to read {}: {}", var.name(), e))
    })
}

/// Coordinates and bounds get the same fill masking as data, so land points
/// written as `1e20` become `NaN` instead of real longitudes.
fn read_coordinate(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    let raw = read_f64(var)?;
    Ok(unpack_values(var, raw))
}

/// Apply `scale_factor` / `add_offset` and turn fill values into `NaN`.
fn unpack_values(var: &netcdf::Variable, raw: Vec<f64>) -> Vec<f64> {
    let fill_value = get_f64_attr(var, "_FillValue");
    let missing_value = get_f64_attr(var, "missing_value");
    let scale_factor = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);

    raw.into_iter()
        .map(|val| {
            let is_missing = !val.is_finite()
                || val.abs() >= MISSING_THRESHOLD
                || fill_value.map_or(false, |f| val == f)
                || missing_value.map_or(false, |m| val == m);
            if is_missing {
                f64::NAN
            } else {
                val * scale_factor + add_offset
            }
        })
        .collect()
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f64 attribute.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Helper to get string attribute.
fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
