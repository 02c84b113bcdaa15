//! Projection registry and configured transforms.
//!
//! A [`Projection`] is the user-facing configuration: a type code plus
//! optional parameters. [`Projection::resolve`] turns it into a
//! [`Projector`] once the data's latitude is known, which matters for the
//! polar type whose hemisphere is inferred.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{ProjectionError, ProjectionResult};
use crate::geographic::PlateCarree;
use crate::lambert::LambertConformal;
use crate::mercator::Mercator;
use crate::polar::{Hemisphere, PolarStereographic};

/// Default Lambert standard parallels for northern data, degrees.
const LAMBERT_PARALLELS: (f64, f64) = (30.0, 60.0);

/// Forward and inverse mapping between geographic degrees and plane units.
pub trait MapProjection {
    /// Project `(lat, lon)` in degrees. `None` when the point cannot be shown.
    fn forward(&self, lat: f64, lon: f64) -> Option<(f64, f64)>;

    /// Recover `(lat, lon)` in degrees from plane coordinates.
    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)>;

    fn central_longitude(&self) -> f64;

    /// Cylindrical projections map longitude linearly onto `x` without
    /// wrapping, so callers must keep each cell's longitudes contiguous.
    fn is_cylindrical(&self) -> bool {
        false
    }
}

pub(crate) fn valid_geographic(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat)
}

/// Registered projection types and their integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionType {
    /// Code 0: longitude/latitude used directly
    Linear,
    /// Code -3: polar stereographic, hemisphere taken from the data
    Polar,
    /// Code 4
    Lambert,
    /// Code 5
    Mercator,
    /// Code 6: polar stereographic with an explicit hemisphere
    PolarStereographic,
}

impl ProjectionType {
    pub const ALL: [ProjectionType; 5] = [
        ProjectionType::Linear,
        ProjectionType::Polar,
        ProjectionType::Lambert,
        ProjectionType::Mercator,
        ProjectionType::PolarStereographic,
    ];

    pub fn from_code(code: i32) -> ProjectionResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| ProjectionError::UnknownType(code.to_string()))
    }

    pub fn code(&self) -> i32 {
        match self {
            ProjectionType::Linear => 0,
            ProjectionType::Polar => -3,
            ProjectionType::Lambert => 4,
            ProjectionType::Mercator => 5,
            ProjectionType::PolarStereographic => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProjectionType::Linear => "linear",
            ProjectionType::Polar => "polar",
            ProjectionType::Lambert => "lambert",
            ProjectionType::Mercator => "mercator",
            ProjectionType::PolarStereographic => "polar stereographic",
        }
    }

    /// Look up a type by name. Case, `_` and `-` are ignored.
    pub fn from_name(name: &str) -> ProjectionResult<Self> {
        let normalized: String = name
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        match normalized.as_str() {
            "linear" | "plate carree" | "latlon" => Ok(ProjectionType::Linear),
            "polar" | "polar (non gctp)" => Ok(ProjectionType::Polar),
            "lambert" | "lambert conformal" | "lambert conformal c" => {
                Ok(ProjectionType::Lambert)
            }
            "mercator" => Ok(ProjectionType::Mercator),
            "polar stereographic" | "polarstereographic" => {
                Ok(ProjectionType::PolarStereographic)
            }
            _ => Err(ProjectionError::UnknownType(name.to_string())),
        }
    }
}

impl fmt::Display for ProjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl FromStr for ProjectionType {
    type Err = ProjectionError;

    /// Accepts either an integer code (`"-3"`) or a name (`"polar"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i32>() {
            Ok(code) => Self::from_code(code),
            Err(_) => Self::from_name(s),
        }
    }
}

/// Projection configuration attached to a graphics method.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    kind: ProjectionType,
    central_longitude: f64,
    hemisphere: Option<Hemisphere>,
    standard_parallels: Option<(f64, f64)>,
}

impl Projection {
    pub fn new(kind: ProjectionType) -> Self {
        Self {
            kind,
            central_longitude: 0.0,
            hemisphere: None,
            standard_parallels: None,
        }
    }

    /// Configure by integer type code. Unregistered codes are rejected.
    pub fn from_code(code: i32) -> ProjectionResult<Self> {
        ProjectionType::from_code(code).map(Self::new)
    }

    pub fn kind(&self) -> ProjectionType {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    pub fn central_longitude(&self) -> f64 {
        self.central_longitude
    }

    pub fn hemisphere(&self) -> Option<Hemisphere> {
        self.hemisphere
    }

    pub fn with_central_longitude(mut self, lon: f64) -> ProjectionResult<Self> {
        if !lon.is_finite() {
            return Err(ProjectionError::InvalidParameter {
                param: "central_longitude",
                message: format!("{} is not finite", lon),
            });
        }
        self.central_longitude = lon;
        Ok(self)
    }

    /// Fix the hemisphere instead of inferring it from the data.
    pub fn with_hemisphere(mut self, hemisphere: Hemisphere) -> Self {
        self.hemisphere = Some(hemisphere);
        self
    }

    /// Standard parallels for the Lambert type. Validated on resolve.
    pub fn with_standard_parallels(mut self, latin1: f64, latin2: f64) -> Self {
        self.standard_parallels = Some((latin1, latin2));
        self
    }

    /// Build the transform for data centred on `mean_latitude`.
    ///
    /// The polar type needs `mean_latitude` unless a hemisphere was set.
    pub fn resolve(&self, mean_latitude: Option<f64>) -> ProjectionResult<Projector> {
        let lon0 = self.central_longitude;
        let projector = match self.kind {
            ProjectionType::Linear => Projector::Linear(PlateCarree::new(lon0)),
            ProjectionType::Mercator => Projector::Mercator(Mercator::new(lon0)),
            ProjectionType::Polar => {
                let hemisphere = match (self.hemisphere, mean_latitude) {
                    (Some(h), _) => h,
                    (None, Some(lat)) if lat.is_finite() => {
                        let h = Hemisphere::from_latitude(lat);
                        debug!(mean_latitude = lat, hemisphere = %h, "Inferred polar hemisphere");
                        h
                    }
                    _ => return Err(ProjectionError::NoHemisphere(self.kind.name())),
                };
                Projector::Polar(PolarStereographic::new(hemisphere, lon0))
            }
            ProjectionType::PolarStereographic => {
                let hemisphere = self.hemisphere.unwrap_or(Hemisphere::North);
                Projector::Polar(PolarStereographic::new(hemisphere, lon0))
            }
            ProjectionType::Lambert => {
                let (latin1, latin2) = match (self.standard_parallels, mean_latitude) {
                    (Some(parallels), _) => parallels,
                    (None, Some(lat)) if lat < 0.0 => (-LAMBERT_PARALLELS.0, -LAMBERT_PARALLELS.1),
                    _ => LAMBERT_PARALLELS,
                };
                Projector::Lambert(LambertConformal::new(lon0, latin1, latin2)?)
            }
        };
        Ok(projector)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(ProjectionType::Linear)
    }
}

/// A resolved, ready-to-use projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Projector {
    Linear(PlateCarree),
    Mercator(Mercator),
    Polar(PolarStereographic),
    Lambert(LambertConformal),
}

impl Projector {
    fn inner(&self) -> &dyn MapProjection {
        match self {
            Projector::Linear(p) => p,
            Projector::Mercator(p) => p,
            Projector::Polar(p) => p,
            Projector::Lambert(p) => p,
        }
    }
}

impl MapProjection for Projector {
    fn forward(&self, lat: f64, lon: f64) -> Option<(f64, f64)> {
        self.inner().forward(lat, lon)
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.inner().inverse(x, y)
    }

    fn central_longitude(&self) -> f64 {
        self.inner().central_longitude()
    }

    fn is_cylindrical(&self) -> bool {
        self.inner().is_cylindrical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for kind in ProjectionType::ALL {
            assert_eq!(ProjectionType::from_code(kind.code()).unwrap(), kind);
            assert_eq!(ProjectionType::from_name(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_polar_code_accepted() {
        let proj = Projection::from_code(-3).unwrap();
        assert_eq!(proj.kind(), ProjectionType::Polar);
        assert_eq!(proj.code(), -3);
    }

    #[test]
    fn test_unknown_code_names_the_code() {
        let err = Projection::from_code(-99).unwrap_err();
        assert_eq!(err, ProjectionError::UnknownType("-99".to_string()));
        assert!(err.to_string().contains("-99"));
    }

    #[test]
    fn test_from_str_accepts_codes_and_names() {
        assert_eq!("-3".parse::<ProjectionType>().unwrap(), ProjectionType::Polar);
        assert_eq!(" 5 ".parse::<ProjectionType>().unwrap(), ProjectionType::Mercator);
        assert_eq!(
            "Polar_Stereographic".parse::<ProjectionType>().unwrap(),
            ProjectionType::PolarStereographic
        );
        assert!("robinson".parse::<ProjectionType>().is_err());
    }

    #[test]
    fn test_polar_hemisphere_inferred_from_data() {
        let proj = Projection::from_code(-3).unwrap();
        match proj.resolve(Some(-45.0)).unwrap() {
            Projector::Polar(p) => assert_eq!(p.hemisphere, Hemisphere::South),
            other => panic!("expected polar projector, got {:?}", other),
        }
        match proj.resolve(Some(45.0)).unwrap() {
            Projector::Polar(p) => assert_eq!(p.hemisphere, Hemisphere::North),
            other => panic!("expected polar projector, got {:?}", other),
        }
    }

    #[test]
    fn test_polar_without_latitudes_fails() {
        let proj = Projection::from_code(-3).unwrap();
        assert!(matches!(
            proj.resolve(None),
            Err(ProjectionError::NoHemisphere(_))
        ));
        // An explicit hemisphere needs no data.
        assert!(proj.with_hemisphere(Hemisphere::South).resolve(None).is_ok());
    }

    #[test]
    fn test_lambert_parallels_follow_data_hemisphere() {
        let proj = Projection::from_code(4).unwrap();
        match proj.resolve(Some(-40.0)).unwrap() {
            Projector::Lambert(p) => assert!(p.cone_constant() < 0.0),
            other => panic!("expected lambert projector, got {:?}", other),
        }
        let bad = Projection::from_code(4)
            .unwrap()
            .with_standard_parallels(20.0, -20.0);
        assert!(bad.resolve(Some(0.0)).is_err());
    }

    #[test]
    fn test_cylindrical_flag() {
        let linear = Projection::default().resolve(None).unwrap();
        let polar = Projection::from_code(6).unwrap().resolve(None).unwrap();
        assert!(linear.is_cylindrical());
        assert!(!polar.is_cylindrical());
    }

    #[test]
    fn test_non_finite_central_longitude_rejected() {
        assert!(Projection::default().with_central_longitude(f64::NAN).is_err());
    }
}
