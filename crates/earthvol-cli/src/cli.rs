//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use earthvol_core::{StepPolicy, SurveyConfig};
use earthvol_engine::DEFAULT_NODATA;
use std::path::PathBuf;

/// Cut/fill earthwork volumes from a DEM.
#[derive(Debug, Parser)]
#[command(name = "earthvol", version, about)]
pub struct Cli {
    /// Only log warnings and errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a cut/fill volume survey.
    Survey(SurveyArgs),
    /// List the registered algorithms.
    Algorithms,
    /// Run a registered algorithm by id.
    Run {
        /// Algorithm id, as listed by `earthvol algorithms`.
        id: String,
        #[command(flatten)]
        args: SurveyArgs,
    },
}

/// Inputs for the survey subcommand.
#[derive(Debug, Args)]
pub struct SurveyArgs {
    /// Source DEM raster.
    #[arg(long)]
    pub dem: PathBuf,

    /// Boundary polygon layer to clip against.
    #[arg(long)]
    pub boundary: PathBuf,

    /// Destination CSV file.
    #[arg(long)]
    pub output: PathBuf,

    /// Elevation step in meters. Defaults to a tenth of the range.
    #[arg(long)]
    pub step: Option<f64>,

    /// Raster band to evaluate.
    #[arg(long, default_value_t = 1)]
    pub band: u32,

    /// No-data value for pixels outside the boundary.
    #[arg(long, default_value_t = DEFAULT_NODATA, allow_hyphen_values = true)]
    pub nodata: f64,

    /// Path to the qgis_process executable.
    #[arg(long, value_name = "PATH")]
    pub qgis_process: Option<PathBuf>,

    /// Keep the intermediate clipped raster next to the output file.
    #[arg(long)]
    pub keep_clipped: bool,
}

impl SurveyArgs {
    /// Step policy selected by the flags.
    pub fn step_policy(&self) -> StepPolicy {
        match self.step {
            Some(step) => StepPolicy::Explicit(step),
            None => StepPolicy::TenthOfRange,
        }
    }

    /// Build the survey config, placing the clipped raster at `clipped`.
    pub fn survey_config(&self, clipped: PathBuf) -> SurveyConfig {
        let mut config = SurveyConfig::new(&self.dem, &self.boundary, &self.output);
        config.clipped = clipped;
        config.band = self.band;
        config.step = self.step_policy();
        config.nodata = self.nodata;
        config
    }
}
