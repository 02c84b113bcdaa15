//! NetCDF fixture files for tests.
//!
//! Writes small CF-style files with the layout of classic curvilinear model
//! output: `sample(nj, ni)` with `lat`/`lon` centers and `bounds_lat` /
//! `bounds_lon` corners.

use std::path::{Path, PathBuf};

use crate::generators::{
    create_curvilinear_centers, create_curvilinear_corners, create_sample_values, CurveGridSpec,
};

/// File name the pipeline looks for inside the data directory.
pub const SAMPLE_FILE_NAME: &str = "sampleCurveGrid4.nc";

/// Variable name of the sample field.
pub const SAMPLE_VARIABLE: &str = "sample";

/// Missing value marker written to fixtures.
pub const MISSING_VALUE: f64 = 1.0e20;

/// Options for [`write_curvilinear_netcdf`].
#[derive(Debug, Clone)]
pub struct CurveFixture {
    pub spec: CurveGridSpec,
    /// Write `bounds_lat` / `bounds_lon` variables.
    pub with_bounds: bool,
    /// Prepend a `time` dimension of length 1.
    pub with_time: bool,
    /// Flat cell indices to write as missing.
    pub missing_cells: Vec<usize>,
    /// Flat cell indices whose center and bounds coordinates are written as
    /// [`MISSING_VALUE`], the way ocean models mark land points.
    pub missing_coordinates: Vec<usize>,
}

impl Default for CurveFixture {
    fn default() -> Self {
        Self {
            spec: CurveGridSpec::sample(),
            with_bounds: true,
            with_time: false,
            missing_cells: Vec::new(),
            missing_coordinates: Vec::new(),
        }
    }
}

impl CurveFixture {
    pub fn small() -> Self {
        Self {
            spec: CurveGridSpec::small(),
            ..Default::default()
        }
    }
}

/// Write a curvilinear sample file to `path`.
pub fn write_curvilinear_netcdf(path: &Path, fixture: &CurveFixture) -> Result<(), netcdf::Error> {
    let spec = &fixture.spec;
    let (mut lat, mut lon) = create_curvilinear_centers(spec);
    let mut values = create_sample_values(&lat, &lon);
    for &idx in &fixture.missing_coordinates {
        if idx < lat.len() {
            lat[idx] = MISSING_VALUE;
            lon[idx] = MISSING_VALUE;
        }
    }
    for &idx in &fixture.missing_cells {
        if let Some(v) = values.get_mut(idx) {
            *v = MISSING_VALUE;
        }
    }

    let mut file = netcdf::create(path)?;
    file.add_dimension("nj", spec.nj)?;
    file.add_dimension("ni", spec.ni)?;
    file.add_dimension("nvert", 4)?;
    if fixture.with_time {
        file.add_dimension("time", 1)?;
    }

    {
        let mut var = file.add_variable::<f64>("lat", &["nj", "ni"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_attribute("standard_name", "latitude")?;
        if fixture.with_bounds {
            var.put_attribute("bounds", "bounds_lat")?;
        }
        var.put_values(&lat, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["nj", "ni"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_attribute("standard_name", "longitude")?;
        if fixture.with_bounds {
            var.put_attribute("bounds", "bounds_lon")?;
        }
        var.put_values(&lon, ..)?;
    }

    if fixture.with_bounds {
        let (mut corner_lat, mut corner_lon) = create_curvilinear_corners(spec);
        for &idx in &fixture.missing_coordinates {
            for v in idx * 4..(idx * 4 + 4).min(corner_lat.len()) {
                corner_lat[v] = MISSING_VALUE;
                corner_lon[v] = MISSING_VALUE;
            }
        }
        file.add_variable::<f64>("bounds_lat", &["nj", "ni", "nvert"])?
            .put_values(&corner_lat, ..)?;
        file.add_variable::<f64>("bounds_lon", &["nj", "ni", "nvert"])?
            .put_values(&corner_lon, ..)?;
    }

    let dims: &[&str] = if fixture.with_time {
        &["time", "nj", "ni"]
    } else {
        &["nj", "ni"]
    };
    let mut var = file.add_variable::<f64>(SAMPLE_VARIABLE, dims)?;
    var.put_attribute("coordinates", "lat lon")?;
    var.put_attribute("units", "K")?;
    var.put_attribute("long_name", "synthetic sample field")?;
    var.put_attribute("missing_value", MISSING_VALUE)?;
    var.put_values(&values, ..)?;

    Ok(())
}

/// Write a file with 1-D `lat(lat)` / `lon(lon)` axes and a `field(lat, lon)` variable.
pub fn write_rectilinear_netcdf(
    path: &Path,
    lats: &[f64],
    lons: &[f64],
    values: &[f64],
) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_dimension("lat", lats.len())?;
    file.add_dimension("lon", lons.len())?;

    {
        let mut var = file.add_variable::<f64>("lat", &["lat"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_values(lats, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_values(lons, ..)?;
    }
    file.add_variable::<f64>("field", &["lat", "lon"])?
        .put_values(values, ..)?;

    Ok(())
}

/// Create `dir/sampleCurveGrid4.nc` and return its path.
pub fn write_sample_data_dir(dir: &Path, fixture: &CurveFixture) -> Result<PathBuf, netcdf::Error> {
    let path = dir.join(SAMPLE_FILE_NAME);
    write_curvilinear_netcdf(&path, fixture)?;
    Ok(path)
}
