//! # earthvol-core
//!
//! Cut/fill earthwork volume computation for a stockpile or excavation site.
//!
//! Given a DEM clipped to a site boundary, the core sweeps a sequence of
//! elevation reference levels across the surface's value range and, at each
//! level, asks an external geoprocessing engine for the volume of terrain
//! above (fill) and below (cut) that level. The classified, unit-converted
//! samples are assembled into an ordered table and exported as CSV.
//!
//! The crate is organized around two pieces:
//!
//! - [`LevelSweep`]: the deterministic, finite sequence of reference levels
//!   covering the elevation range at a fixed step.
//! - [`sweep_volumes`]: drives the engine once per level, classifies each
//!   returned raw volume into its fill/cut decomposition, and accumulates
//!   the result table together with diagnostics for any skipped levels.
//!
//! [`run_survey`] wraps both behind the full pipeline (clip, statistics,
//! sweep, export) for callers that want a single entry point.
//!
//! # Example
//!
//! ```no_run
//! use earthvol_core::{run_survey, SurveyConfig, SurveyError};
//! use earthvol_engine::GeoProcessing;
//!
//! fn survey<E: GeoProcessing>(engine: &E) -> Result<(), SurveyError> {
//!     let config = SurveyConfig::new("heap-dem.tif", "heap/polygons.shp", "volume_data.csv");
//!     let outcome = run_survey(engine, &config, None)?;
//!     println!("{} samples, {} levels skipped", outcome.table.len(), outcome.skipped.len());
//!     Ok(())
//! }
//! ```

mod aggregate;
mod export;
mod levels;
mod survey;

pub use aggregate::{
    sweep_volumes, SkippedLevel, SweepError, SweepReport, VolumeSample, VolumeTable,
    CUBIC_METERS_PER_CUBIC_KILOMETER,
};
pub use export::{read_table, write_table, ExportError, CSV_HEADER};
pub use levels::{ElevationRange, LevelError, LevelSweep, StepPolicy};
pub use survey::{run_survey, SurveyConfig, SurveyError, SurveyOutcome};
