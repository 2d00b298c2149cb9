//! JSON result parsing for `qgis_process run --json` invocations.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Envelope of a JSON-mode run; only the results block is of interest.
#[derive(Debug, Deserialize)]
struct RunOutput<R> {
    results: R,
}

/// Parse the results block out of a run's stdout.
pub(crate) fn parse_results<R: DeserializeOwned>(stdout: &[u8]) -> Result<R, serde_json::Error> {
    let output: RunOutput<R> = serde_json::from_slice(stdout)?;
    Ok(output.results)
}

/// Results of `gdal:cliprasterbymasklayer`.
#[derive(Debug, Deserialize)]
pub(crate) struct ClipResults {
    /// Path of the clipped raster.
    #[serde(rename = "OUTPUT")]
    pub output: String,
}

/// Results of `native:rasterlayerstatistics`.
#[derive(Debug, Deserialize)]
pub(crate) struct StatisticsResults {
    #[serde(rename = "MIN")]
    pub minimum: f64,
    #[serde(rename = "MAX")]
    pub maximum: f64,
}

/// Results of `native:rastersurfacevolume`.
///
/// The engine reports the pixel count as a JSON number that may carry a
/// fractional representation; it is truncated on conversion.
#[derive(Debug, Deserialize)]
pub(crate) struct VolumeResults {
    #[serde(rename = "VOLUME")]
    pub volume_m3: f64,
    #[serde(rename = "AREA")]
    pub area_m2: f64,
    #[serde(rename = "PIXEL_COUNT")]
    pub pixel_count: f64,
}
