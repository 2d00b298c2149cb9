//! Subprocess driver for the `qgis_process` tool.

use crate::output::{parse_results, ClipResults, StatisticsResults, VolumeResults};
use earthvol_engine::{
    BandStatistics, ClipRequest, EngineError, GeoProcessing, SurfaceHandle, VolumeFeature,
};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const CLIP_ALGORITHM: &str = "gdal:cliprasterbymasklayer";
const STATISTICS_ALGORITHM: &str = "native:rasterlayerstatistics";
const VOLUME_ALGORITHM: &str = "native:rastersurfacevolume";

/// Volume counting method 1: count only cells below/above the level.
const VOLUME_METHOD: u32 = 1;

/// Environment variable overriding the `qgis_process` location.
pub const QGIS_PROCESS_ENV: &str = "QGIS_PROCESS_PATH";

/// A run attempt that did not produce usable JSON output.
enum RunFailure {
    /// The process could not be spawned at all.
    Spawn(std::io::Error),
    /// The process ran but reported failure.
    Failed(String),
}

/// Engine adapter that shells out to `qgis_process`.
///
/// The adapter holds only the binary location; every operation is one
/// blocking subprocess invocation. Operations are expected to be called
/// sequentially; the underlying tool gives no concurrency guarantee for
/// repeated runs against the same raster.
#[derive(Debug, Clone)]
pub struct QgisProcessEngine {
    binary: PathBuf,
}

impl QgisProcessEngine {
    /// Wrap an explicit `qgis_process` binary path without probing it.
    pub fn new<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Locate `qgis_process` and verify it answers a version probe.
    ///
    /// The location is taken from `explicit` if given, else from the
    /// `QGIS_PROCESS_PATH` environment variable, else resolved as
    /// `qgis_process` on PATH. A binary that cannot be spawned or exits
    /// nonzero on `--version` yields [`EngineError::Unavailable`].
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self, EngineError> {
        let binary = explicit
            .or_else(|| std::env::var_os(QGIS_PROCESS_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("qgis_process"));
        let engine = Self::new(binary);
        engine.probe()?;
        Ok(engine)
    }

    /// Path of the binary this engine invokes.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn probe(&self) -> Result<(), EngineError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|err| self.unavailable(&err.to_string()))?;
        if !output.status.success() {
            return Err(self.unavailable(&String::from_utf8_lossy(&output.stderr)));
        }
        Ok(())
    }

    fn unavailable(&self, reason: &str) -> EngineError {
        EngineError::Unavailable(format!(
            "{}: {}",
            self.binary.display(),
            reason.trim()
        ))
    }

    /// Run one algorithm in JSON mode and return its raw stdout.
    fn run(&self, algorithm: &str, params: &[(&str, String)]) -> Result<Vec<u8>, RunFailure> {
        let args = command_args(algorithm, params);
        debug!(algorithm, ?args, "invoking qgis_process");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(RunFailure::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RunFailure::Failed(format!(
                "{algorithm} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

/// Assemble the argument list for one JSON-mode algorithm run.
fn command_args(algorithm: &str, params: &[(&str, String)]) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        algorithm.to_string(),
        "--json".to_string(),
        "--".to_string(),
    ];
    args.extend(params.iter().map(|(name, value)| format!("{name}={value}")));
    args
}

fn clip_params(request: &ClipRequest) -> Vec<(&'static str, String)> {
    vec![
        ("INPUT", request.source.display().to_string()),
        ("MASK", request.mask.display().to_string()),
        ("NODATA", request.nodata.to_string()),
        ("ALPHA_BAND", "false".to_string()),
        ("CROP_TO_CUTLINE", "true".to_string()),
        ("KEEP_RESOLUTION", "true".to_string()),
        // 0 keeps the input data type.
        ("DATA_TYPE", "0".to_string()),
        ("OUTPUT", request.output.display().to_string()),
    ]
}

fn statistics_params(surface: &SurfaceHandle, band: u32) -> Vec<(&'static str, String)> {
    vec![
        ("INPUT", surface.path().display().to_string()),
        ("BAND", band.to_string()),
    ]
}

fn volume_params(surface: &SurfaceHandle, band: u32, level: f64) -> Vec<(&'static str, String)> {
    vec![
        ("INPUT", surface.path().display().to_string()),
        ("BAND", band.to_string()),
        ("LEVEL", level.to_string()),
        ("METHOD", VOLUME_METHOD.to_string()),
    ]
}

impl GeoProcessing for QgisProcessEngine {
    fn clip(&self, request: &ClipRequest) -> earthvol_engine::Result<SurfaceHandle> {
        let stdout = self
            .run(CLIP_ALGORITHM, &clip_params(request))
            .map_err(|failure| match failure {
                RunFailure::Spawn(err) => self.unavailable(&err.to_string()),
                RunFailure::Failed(reason) => EngineError::ClipFailed { reason },
            })?;

        let results: ClipResults = parse_results(&stdout).map_err(|err| {
            EngineError::ClipFailed {
                reason: format!("unparsable engine output: {err}"),
            }
        })?;
        Ok(SurfaceHandle::new(results.output))
    }

    fn band_statistics(
        &self,
        surface: &SurfaceHandle,
        band: u32,
    ) -> earthvol_engine::Result<BandStatistics> {
        let stdout = self
            .run(STATISTICS_ALGORITHM, &statistics_params(surface, band))
            .map_err(|failure| match failure {
                RunFailure::Spawn(err) => self.unavailable(&err.to_string()),
                RunFailure::Failed(reason) => EngineError::InvalidSurface { reason },
            })?;

        let results: StatisticsResults = parse_results(&stdout).map_err(|err| {
            EngineError::InvalidSurface {
                reason: format!("unparsable statistics output: {err}"),
            }
        })?;

        if !results.minimum.is_finite() || !results.maximum.is_finite() {
            return Err(EngineError::InvalidSurface {
                reason: format!(
                    "non-finite extrema (min {}, max {})",
                    results.minimum, results.maximum
                ),
            });
        }

        Ok(BandStatistics {
            minimum: results.minimum,
            maximum: results.maximum,
        })
    }

    fn volume_at_level(
        &self,
        surface: &SurfaceHandle,
        band: u32,
        level: f64,
    ) -> earthvol_engine::Result<Vec<VolumeFeature>> {
        let stdout = self
            .run(VOLUME_ALGORITHM, &volume_params(surface, band, level))
            .map_err(|failure| match failure {
                RunFailure::Spawn(err) => self.unavailable(&err.to_string()),
                RunFailure::Failed(reason) => EngineError::LevelQuery { level, reason },
            })?;

        let results: VolumeResults = parse_results(&stdout).map_err(|err| {
            EngineError::LevelQuery {
                level,
                reason: format!("unparsable volume output: {err}"),
            }
        })?;

        Ok(vec![VolumeFeature {
            raw_volume_m3: results.volume_m3,
            area_m2: results.area_m2,
            pixel_count: results.pixel_count as u64,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_layout() {
        let args = command_args(
            VOLUME_ALGORITHM,
            &[("INPUT", "clipped.tif".to_string()), ("BAND", "1".to_string())],
        );
        assert_eq!(
            args,
            vec![
                "run",
                "native:rastersurfacevolume",
                "--json",
                "--",
                "INPUT=clipped.tif",
                "BAND=1",
            ]
        );
    }

    #[test]
    fn test_clip_params_carry_the_mask_options() {
        let request = ClipRequest::new("dem.tif", "heap.shp", "clipped.tif");
        let params = clip_params(&request);

        let lookup = |name: &str| {
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(lookup("INPUT"), Some("dem.tif"));
        assert_eq!(lookup("MASK"), Some("heap.shp"));
        assert_eq!(lookup("NODATA"), Some("-9999"));
        assert_eq!(lookup("CROP_TO_CUTLINE"), Some("true"));
        assert_eq!(lookup("KEEP_RESOLUTION"), Some("true"));
        assert_eq!(lookup("OUTPUT"), Some("clipped.tif"));
    }

    #[test]
    fn test_volume_params_name_the_level_and_method() {
        let surface = SurfaceHandle::new("clipped.tif");
        let params = volume_params(&surface, 1, 107.5);
        assert!(params.contains(&("LEVEL", "107.5".to_string())));
        assert!(params.contains(&("METHOD", "1".to_string())));
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let err = QgisProcessEngine::discover(Some(PathBuf::from(
            "/nonexistent/qgis_process",
        )))
        .unwrap_err();
        assert!(matches!(err, EngineError::Unavailable(_)));
    }

    #[test]
    fn test_missing_binary_volume_query_is_unavailable_not_per_level() {
        // Losing the binary mid-run is a systemic failure: it must abort
        // the sweep, not be skipped level by level.
        let engine = QgisProcessEngine::new("/nonexistent/qgis_process");
        let surface = SurfaceHandle::new("clipped.tif");
        let err = engine.volume_at_level(&surface, 1, 10.0).unwrap_err();
        assert!(matches!(err, EngineError::Unavailable(_)));
    }
}
