//! Pipeline configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults (the sized
//! scenario), a YAML file, `MESHFILL_*` environment variables, then CLI flags.

use plot_common::{CoordinateRange, PlotError, PlotResult};
use projection::ProjectionType;
use renderer::meshfill::DEFAULT_MISSING_INDEX;
use renderer::Colormap;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Data file the pipeline reads when none is configured.
pub const DEFAULT_DATA_FILE: &str = "sampleCurveGrid4.nc";
pub const DEFAULT_VARIABLE: &str = "sample";
pub const DEFAULT_OUTPUT: &str = "test_vcs_basic_meshfill_-3_proj_SH.png";

/// Canvas size of the sized scenario.
pub const SIZED_DIMENSIONS: (u32, u32) = (1200, 1091);

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "MESHFILL_DATA_DIR";
/// Environment variable overriding the output path.
pub const ENV_OUTPUT: &str = "MESHFILL_OUTPUT";
/// Environment variable overriding the colormap.
pub const ENV_COLORMAP: &str = "MESHFILL_COLORMAP";

/// The two reference runs. They differ only in canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Explicit 1200x1091 background canvas.
    #[default]
    Sized,
    /// Canvas default size.
    Default,
}

impl Scenario {
    /// Canvas dimensions, or `None` to keep the canvas default.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Scenario::Sized => Some(SIZED_DIMENSIONS),
            Scenario::Default => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Sized => "sized",
            Scenario::Default => "default",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sized" | "a" => Ok(Scenario::Sized),
            "default" | "b" => Ok(Scenario::Default),
            other => Err(PlotError::invalid_parameter(
                "scenario",
                format!("'{}' is not one of: sized, default", other),
            )),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub canvas: CanvasConfig,
    pub meshfill: MeshfillConfig,
    pub data: DataConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Background width; must be set together with `height`.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub colormap: String,
    /// Render without an interactive window.
    pub background: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let (width, height) = SIZED_DIMENSIONS;
        Self {
            width: Some(width),
            height: Some(height),
            colormap: "rainbow".to_string(),
            background: true,
        }
    }
}

impl CanvasConfig {
    /// Explicit dimensions, if both are configured.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshfillConfig {
    /// Projection type code (-3 polar, 0 linear, 4 lambert, 5 mercator, 6 polar stereographic).
    pub projection: i32,
    pub mesh: bool,
    pub legend: bool,
    /// Explicit contour levels; computed from the data when absent.
    pub levels: Option<Vec<f64>>,
    pub fill_colors: Option<Vec<u8>>,
    pub missing_color: u8,
}

impl Default for MeshfillConfig {
    fn default() -> Self {
        Self {
            projection: -3,
            mesh: true,
            legend: true,
            levels: None,
            fill_colors: None,
            missing_color: DEFAULT_MISSING_INDEX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub file: String,
    pub variable: String,
    pub selections: Vec<CoordinateRange>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file: DEFAULT_DATA_FILE.to_string(),
            variable: DEFAULT_VARIABLE.to_string(),
            selections: vec![southern_hemisphere()],
        }
    }
}

impl DataConfig {
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.file)
    }
}

fn southern_hemisphere() -> CoordinateRange {
    CoordinateRange {
        axis: plot_common::Axis::Latitude,
        min: -90.0,
        max: 0.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl PlotConfig {
    /// Defaults for a reference scenario.
    pub fn for_scenario(scenario: Scenario) -> Self {
        let mut config = Self::default();
        config.set_scenario(scenario);
        config
    }

    pub fn set_scenario(&mut self, scenario: Scenario) {
        let dims = scenario.dimensions();
        self.canvas.width = dims.map(|(w, _)| w);
        self.canvas.height = dims.map(|(_, h)| h);
    }

    /// Parse YAML text. Missing sections keep their defaults.
    pub fn from_yaml_str(text: &str) -> PlotResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| PlotError::invalid_parameter("config", e.to_string()))
    }

    /// Load a YAML configuration file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> PlotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PlotError::FileNotFound(path.display().to_string()),
            _ => PlotError::DataReadError(format!("{}: {}", path.display(), e)),
        })?;
        Self::from_yaml_str(&text)
    }

    /// Overlay `MESHFILL_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok().filter(|v| !v.is_empty()));
    }

    /// Overlay values from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(ENV_OUTPUT) {
            self.output.path = PathBuf::from(path);
        }
        if let Some(name) = lookup(ENV_COLORMAP) {
            self.canvas.colormap = name;
        }
    }

    /// Check everything that can be checked without touching the data file.
    pub fn validate(&self) -> PlotResult<()> {
        match (self.canvas.width, self.canvas.height) {
            (Some(0), _) | (_, Some(0)) => {
                return Err(PlotError::invalid_parameter(
                    "canvas",
                    "width and height must be positive",
                ))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(PlotError::invalid_parameter(
                    "canvas",
                    "width and height must be set together",
                ))
            }
            _ => {}
        }

        Colormap::named(&self.canvas.colormap)?;
        ProjectionType::from_code(self.meshfill.projection)?;

        if let (Some(levels), Some(colors)) = (&self.meshfill.levels, &self.meshfill.fill_colors) {
            if levels.len() != colors.len() + 1 {
                return Err(PlotError::invalid_parameter(
                    "fill_colors",
                    format!(
                        "{} levels need {} fill colors, got {}",
                        levels.len(),
                        levels.len().saturating_sub(1),
                        colors.len()
                    ),
                ));
            }
        }

        if self.data.variable.is_empty() {
            return Err(PlotError::invalid_parameter("variable", "must not be empty"));
        }
        for selection in &self.data.selections {
            selection.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plot_common::{Axis, ErrorCategory};
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_sized_scenario() {
        let config = PlotConfig::default();
        assert_eq!(config.canvas.dimensions(), Some((1200, 1091)));
        assert_eq!(config.canvas.colormap, "rainbow");
        assert!(config.canvas.background);
        assert_eq!(config.meshfill.projection, -3);
        assert!(config.meshfill.mesh);
        assert_eq!(config.data.path(), PathBuf::from("./sampleCurveGrid4.nc"));
        assert_eq!(config.data.variable, "sample");
        assert_eq!(config.data.selections, vec![southern_hemisphere()]);
        assert_eq!(config.output.path, PathBuf::from(DEFAULT_OUTPUT));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_scenario_clears_dimensions() {
        let config = PlotConfig::for_scenario(Scenario::Default);
        assert_eq!(config.canvas.dimensions(), None);
        assert_eq!(config.meshfill, MeshfillConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scenario_parse() {
        assert_eq!("SIZED".parse::<Scenario>().unwrap(), Scenario::Sized);
        assert_eq!("default".parse::<Scenario>().unwrap(), Scenario::Default);
        assert!("huge".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
canvas:
  colormap: viridis
data:
  data_dir: /tmp/plots
  selections:
    - axis: latitude
      min: 0
      max: 90
"#;
        let config = PlotConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.canvas.colormap, "viridis");
        assert_eq!(config.canvas.dimensions(), Some((1200, 1091)));
        assert_eq!(config.data.data_dir, PathBuf::from("/tmp/plots"));
        assert_eq!(config.data.file, DEFAULT_DATA_FILE);
        assert_eq!(config.data.selections[0].axis, Axis::Latitude);
        assert_eq!(config.data.selections[0].max, 90.0);
        assert_eq!(config.meshfill.projection, -3);
    }

    #[test]
    fn test_malformed_yaml_is_configuration_error() {
        let err = PlotConfig::from_yaml_str("canvas: [1, 2").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_missing_yaml_file() {
        let err = PlotConfig::from_yaml("/nonexistent/meshfill.yaml").unwrap_err();
        assert!(matches!(err, PlotError::FileNotFound(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DATA_DIR, "/data/vcs"),
            (ENV_OUTPUT, "out/plot.png"),
            (ENV_COLORMAP, "grayscale"),
        ]
        .into_iter()
        .collect();

        let mut config = PlotConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.data.data_dir, PathBuf::from("/data/vcs"));
        assert_eq!(config.output.path, PathBuf::from("out/plot.png"));
        assert_eq!(config.canvas.colormap, "grayscale");
    }

    #[test]
    fn test_validate_rejects_unknown_projection() {
        let mut config = PlotConfig::default();
        config.meshfill.projection = 42;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PlotError::UnknownProjection(_)));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_validate_rejects_unknown_colormap() {
        let mut config = PlotConfig::default();
        config.canvas.colormap = "jet".to_string();
        assert!(matches!(config.validate(), Err(PlotError::UnknownColormap(_))));
    }

    #[test]
    fn test_validate_canvas_size() {
        let mut config = PlotConfig::default();
        config.canvas.height = None;
        assert!(config.validate().is_err());
        config.canvas.height = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_selection_outside_domain() {
        let mut config = PlotConfig::default();
        config.data.selections = vec![CoordinateRange {
            axis: Axis::Latitude,
            min: 95.0,
            max: 120.0,
        }];
        let err = config.validate().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Selection);
    }

    #[test]
    fn test_validate_level_color_counts() {
        let mut config = PlotConfig::default();
        config.meshfill.levels = Some(vec![0.0, 10.0, 20.0]);
        config.meshfill.fill_colors = Some(vec![16]);
        assert!(config.validate().is_err());
        config.meshfill.fill_colors = Some(vec![16, 239]);
        assert!(config.validate().is_ok());
    }
}
