//! Survey orchestration: clip, measure, sweep, export.

use crate::aggregate::{sweep_volumes, SkippedLevel, SweepError, VolumeTable};
use crate::export::{write_table, ExportError};
use crate::levels::{ElevationRange, LevelError, LevelSweep, StepPolicy};
use earthvol_engine::{ClipRequest, EngineError, GeoProcessing, DEFAULT_NODATA};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use thiserror::Error;
use tracing::info;

/// Errors from a full survey run.
///
/// Setup errors (`Config`, `Level`, `Clip`, `InvalidSurface`,
/// `EngineUnavailable`) abort before or during the sweep with no table
/// produced. `Export` happens after aggregation; the computed table rides
/// along in the error so the caller can retry with another destination.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// Invalid configuration, reported before any engine call.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid step or elevation range.
    #[error(transparent)]
    Level(#[from] LevelError),

    /// The DEM could not be clipped to the boundary polygon.
    #[error("clip failed: {0}")]
    Clip(String),

    /// The clipped surface has no usable elevation statistics.
    #[error("invalid surface: {0}")]
    InvalidSurface(String),

    /// The engine is unreachable or misconfigured for the whole run.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The run was cancelled before the sweep completed.
    #[error("survey cancelled")]
    Cancelled,

    /// The result table could not be written to the output destination.
    #[error("export failed: {source}")]
    Export {
        /// The underlying write failure.
        #[source]
        source: ExportError,
        /// The aggregated table, preserved for a retry.
        table: VolumeTable,
        /// Diagnostics for levels skipped during the sweep.
        skipped: Vec<SkippedLevel>,
    },
}

impl From<SweepError> for SurveyError {
    fn from(err: SweepError) -> Self {
        match err {
            SweepError::EngineUnavailable(reason) => SurveyError::EngineUnavailable(reason),
            SweepError::Cancelled => SurveyError::Cancelled,
        }
    }
}

/// Inputs for one survey run.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// Source DEM raster.
    pub dem: PathBuf,
    /// Polygon boundary layer to clip against.
    pub boundary: PathBuf,
    /// Destination CSV file.
    pub output: PathBuf,
    /// Scratch path the engine writes the clipped raster to.
    pub clipped: PathBuf,
    /// Raster band to evaluate. Band numbers start at 1.
    pub band: u32,
    /// Step selection for the sweep.
    pub step: StepPolicy,
    /// No-data value stamped into masked-out pixels by the clip.
    pub nodata: f64,
}

impl SurveyConfig {
    /// Create a config with the default band, step policy, and no-data
    /// value. The clipped raster lands next to the output file.
    pub fn new<D, B, O>(dem: D, boundary: B, output: O) -> Self
    where
        D: Into<PathBuf>,
        B: Into<PathBuf>,
        O: Into<PathBuf>,
    {
        let output = output.into();
        let clipped = output.with_extension("clipped.tif");
        Self {
            dem: dem.into(),
            boundary: boundary.into(),
            output,
            clipped,
            band: 1,
            step: StepPolicy::default(),
            nodata: DEFAULT_NODATA,
        }
    }

    fn validate(&self) -> Result<(), SurveyError> {
        if !self.dem.is_file() {
            return Err(SurveyError::Config(format!(
                "DEM not found: {}",
                self.dem.display()
            )));
        }
        if !self.boundary.exists() {
            return Err(SurveyError::Config(format!(
                "boundary layer not found: {}",
                self.boundary.display()
            )));
        }
        if self.band == 0 {
            return Err(SurveyError::Config(
                "band numbers start at 1".to_string(),
            ));
        }
        if let StepPolicy::Explicit(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err(SurveyError::Level(LevelError::InvalidStep(step)));
            }
        }
        Ok(())
    }
}

/// Result of a completed survey.
#[derive(Debug, Clone)]
pub struct SurveyOutcome {
    /// The full result table, in sweep order.
    pub table: VolumeTable,
    /// Levels the engine failed on, in sweep order.
    pub skipped: Vec<SkippedLevel>,
    /// Number of levels the sweep evaluated, including skipped ones.
    pub levels: usize,
    /// The elevation range the sweep covered.
    pub range: ElevationRange,
    /// The resolved step (m).
    pub step: f64,
}

/// Run the full survey pipeline: clip the DEM to the boundary, read its
/// elevation statistics, sweep the levels, and export the table as CSV.
///
/// The optional `cancel` flag is checked between levels; a cancelled run
/// surfaces as [`SurveyError::Cancelled`] rather than a partial table, so
/// callers can tell an interrupted table from a completed one.
pub fn run_survey<E>(
    engine: &E,
    config: &SurveyConfig,
    cancel: Option<&AtomicBool>,
) -> Result<SurveyOutcome, SurveyError>
where
    E: GeoProcessing + ?Sized,
{
    config.validate()?;

    info!(
        dem = %config.dem.display(),
        boundary = %config.boundary.display(),
        "clipping DEM to boundary"
    );
    let request = ClipRequest {
        source: config.dem.clone(),
        mask: config.boundary.clone(),
        nodata: config.nodata,
        output: config.clipped.clone(),
    };
    let surface = match engine.clip(&request) {
        Ok(surface) => surface,
        Err(EngineError::Unavailable(reason)) => {
            return Err(SurveyError::EngineUnavailable(reason))
        }
        Err(err) => return Err(SurveyError::Clip(err.to_string())),
    };

    let stats = match engine.band_statistics(&surface, config.band) {
        Ok(stats) => stats,
        Err(EngineError::Unavailable(reason)) => {
            return Err(SurveyError::EngineUnavailable(reason))
        }
        Err(err) => return Err(SurveyError::InvalidSurface(err.to_string())),
    };

    let range = ElevationRange::from(stats);
    let step = config.step.resolve(&range)?;
    let sweep = LevelSweep::new(range, step)?;
    let levels = sweep.len();
    info!(
        minimum = range.minimum,
        maximum = range.maximum,
        step,
        levels,
        "sweeping volume levels"
    );

    let report = sweep_volumes(engine, &surface, config.band, sweep, cancel)?;

    info!(
        samples = report.table.len(),
        skipped = report.skipped.len(),
        output = %config.output.display(),
        "exporting volume table"
    );
    if let Err(source) = write_table(&report.table, &config.output) {
        return Err(SurveyError::Export {
            source,
            table: report.table,
            skipped: report.skipped,
        });
    }

    Ok(SurveyOutcome {
        table: report.table,
        skipped: report.skipped,
        levels,
        range,
        step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthvol_engine::{BandStatistics, SurfaceHandle, VolumeFeature};
    use std::fs::File;
    use std::path::Path;

    /// Engine over a fixed range that reports every level's volume as the
    /// level itself, scaled to km³ magnitude.
    struct FixedRangeEngine {
        minimum: f64,
        maximum: f64,
    }

    impl GeoProcessing for FixedRangeEngine {
        fn clip(&self, request: &ClipRequest) -> earthvol_engine::Result<SurfaceHandle> {
            Ok(SurfaceHandle::new(request.output.clone()))
        }

        fn band_statistics(
            &self,
            _surface: &SurfaceHandle,
            _band: u32,
        ) -> earthvol_engine::Result<BandStatistics> {
            Ok(BandStatistics {
                minimum: self.minimum,
                maximum: self.maximum,
            })
        }

        fn volume_at_level(
            &self,
            _surface: &SurfaceHandle,
            _band: u32,
            level: f64,
        ) -> earthvol_engine::Result<Vec<VolumeFeature>> {
            Ok(vec![VolumeFeature::from_volume(level * 1e9)])
        }
    }

    fn fixture_config(dir: &Path) -> SurveyConfig {
        let dem = dir.join("dem.tif");
        let boundary = dir.join("heap.shp");
        File::create(&dem).unwrap();
        File::create(&boundary).unwrap();

        let mut config = SurveyConfig::new(dem, boundary, dir.join("volume_data.csv"));
        config.clipped = dir.join("clipped_dem.tif");
        config
    }

    #[test]
    fn test_missing_dem_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let boundary = dir.path().join("heap.shp");
        File::create(&boundary).unwrap();

        let config = SurveyConfig::new(
            dir.path().join("nope.tif"),
            boundary,
            dir.path().join("out.csv"),
        );
        let engine = FixedRangeEngine {
            minimum: 0.0,
            maximum: 10.0,
        };

        let err = run_survey(&engine, &config, None).unwrap_err();
        assert!(matches!(err, SurveyError::Config(_)));
    }

    #[test]
    fn test_zero_band_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture_config(dir.path());
        config.band = 0;
        let engine = FixedRangeEngine {
            minimum: 0.0,
            maximum: 10.0,
        };

        let err = run_survey(&engine, &config, None).unwrap_err();
        assert!(matches!(err, SurveyError::Config(_)));
    }

    #[test]
    fn test_invalid_explicit_step_rejected_before_engine_calls() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture_config(dir.path());
        config.step = StepPolicy::Explicit(-3.0);
        let engine = FixedRangeEngine {
            minimum: 0.0,
            maximum: 10.0,
        };

        let err = run_survey(&engine, &config, None).unwrap_err();
        assert_eq!(
            match err {
                SurveyError::Level(inner) => inner,
                other => panic!("expected Level error, got {other}"),
            },
            LevelError::InvalidStep(-3.0)
        );
    }

    #[test]
    fn test_default_step_is_a_tenth_of_the_range() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        let engine = FixedRangeEngine {
            minimum: 100.0,
            maximum: 150.0,
        };

        let outcome = run_survey(&engine, &config, None).unwrap();
        assert_eq!(outcome.step, 5.0);
        assert_eq!(outcome.levels, 11);
        assert_eq!(outcome.table.len(), 11);
        assert!(config.output.is_file());
    }

    #[test]
    fn test_flat_surface_gets_one_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        let engine = FixedRangeEngine {
            minimum: 42.0,
            maximum: 42.0,
        };

        let outcome = run_survey(&engine, &config, None).unwrap();
        assert_eq!(outcome.levels, 1);
        assert_eq!(outcome.table.samples()[0].level, 42.0);
    }

    #[test]
    fn test_export_failure_preserves_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture_config(dir.path());
        config.output = dir.path().join("missing-dir").join("out.csv");
        config.step = StepPolicy::Explicit(5.0);
        let engine = FixedRangeEngine {
            minimum: 0.0,
            maximum: 10.0,
        };

        let err = run_survey(&engine, &config, None).unwrap_err();
        match err {
            SurveyError::Export { table, .. } => assert_eq!(table.len(), 3),
            other => panic!("expected Export error, got {other}"),
        }
    }
}
