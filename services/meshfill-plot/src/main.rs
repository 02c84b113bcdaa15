//! Mesh-fill plotting CLI.
//!
//! Reads a curvilinear field from NetCDF, renders it with the mesh-fill
//! method under a map projection, and writes a PNG.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use meshfill_plot::{run, PlotConfig, Scenario};
use plot_common::PlotError;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "meshfill-plot")]
#[command(about = "Render a curvilinear NetCDF field as a mesh-fill PNG")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the data file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference scenario: sized (1200x1091) or default canvas size
    #[arg(long)]
    scenario: Option<Scenario>,

    /// Projection type code
    #[arg(long, allow_hyphen_values = true)]
    projection: Option<i32>,

    /// Fill cells without drawing their outlines
    #[arg(long)]
    no_mesh: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_tracing(args: &Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Defaults, then YAML, then environment, then flags.
fn load_config(args: &Args) -> Result<PlotConfig> {
    let mut config = match &args.config {
        Some(path) => PlotConfig::from_yaml(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PlotConfig::default(),
    };
    config.apply_env();

    if let Some(scenario) = args.scenario {
        config.set_scenario(scenario);
    }
    if let Some(dir) = &args.data_dir {
        config.data.data_dir = dir.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(code) = args.projection {
        config.meshfill.projection = code;
    }
    if args.no_mesh {
        config.meshfill.mesh = false;
    }
    Ok(config)
}

fn execute(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    info!(
        data = %config.data.path().display(),
        output = %config.output.path.display(),
        projection = config.meshfill.projection,
        "Starting mesh-fill plot"
    );

    let report = run(&config).context("Mesh-fill pipeline failed")?;

    info!(
        output = %report.output.display(),
        width = report.width,
        height = report.height,
        cells = report.summary.cells_drawn,
        "Done"
    );
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<PlotError>())
        .map(|e| e.exit_code() as u8)
        .unwrap_or(1)
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_tracing(&args) {
        eprintln!("Failed to initialize logging: {:#}", err);
        return ExitCode::FAILURE;
    }

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_found_behind_context() {
        let err = anyhow::Error::from(PlotError::SelectionError("no rows".into()))
            .context("Mesh-fill pipeline failed")
            .context("outer");
        assert_eq!(exit_code(&err), 4);
    }

    #[test]
    fn test_exit_code_per_category() {
        let cases = [
            (PlotError::UnknownProjection("17".into()), 2),
            (PlotError::FileNotFound("sampleCurveGrid4.nc".into()), 3),
            (PlotError::RenderError("nothing to draw".into()), 5),
        ];
        for (plot_err, code) in cases {
            let err = anyhow::Error::from(plot_err).context("stage");
            assert_eq!(exit_code(&err), code);
        }
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        let err = anyhow::anyhow!("logging already initialised").context("startup");
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "meshfill-plot",
            "--scenario",
            "default",
            "--projection",
            "-3",
            "--no-mesh",
            "--data-dir",
            "/data/vcs",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.canvas.dimensions(), None);
        assert_eq!(config.meshfill.projection, -3);
        assert!(!config.meshfill.mesh);
        assert_eq!(config.data.data_dir, PathBuf::from("/data/vcs"));
    }
}
