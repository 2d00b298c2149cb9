//! Request and result types exchanged with the engine.

use std::path::{Path, PathBuf};

/// Default no-data value stamped into masked-out pixels by the clip.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// Parameters for clipping a raster to a polygon mask.
///
/// The engine crops `source` against `mask`, preserving the source
/// resolution, and writes the result to `output`. Pixels outside the mask
/// are set to `nodata`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipRequest {
    /// Source raster file.
    pub source: PathBuf,
    /// Polygon boundary layer used as the mask.
    pub mask: PathBuf,
    /// No-data value for pixels outside the mask.
    pub nodata: f64,
    /// Destination path for the clipped raster.
    pub output: PathBuf,
}

impl ClipRequest {
    /// Create a clip request with the default no-data value.
    pub fn new<S, M, O>(source: S, mask: M, output: O) -> Self
    where
        S: Into<PathBuf>,
        M: Into<PathBuf>,
        O: Into<PathBuf>,
    {
        Self {
            source: source.into(),
            mask: mask.into(),
            nodata: DEFAULT_NODATA,
            output: output.into(),
        }
    }
}

/// Opaque handle to a raster surface produced by the engine.
///
/// The handle identifies the clipped artifact for subsequent statistics and
/// volume queries. It is owned by the caller and borrowed read-only for the
/// duration of a sweep; the engine never mutates the surface it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceHandle {
    path: PathBuf,
}

impl SurfaceHandle {
    /// Wrap a raster path produced by the engine.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the raster artifact this handle points at.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Elevation extrema for one raster band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandStatistics {
    /// Minimum elevation value (m).
    pub minimum: f64,
    /// Maximum elevation value (m).
    pub maximum: f64,
}

impl BandStatistics {
    /// Elevation difference between the extrema (m).
    pub fn range(&self) -> f64 {
        self.maximum - self.minimum
    }
}

/// Raw engine output for one contiguous region at one reference level.
///
/// `raw_volume_m3` is signed: positive for terrain above the reference
/// plane, negative for terrain below it. The area and pixel count describe
/// the region the engine integrated over.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeFeature {
    /// Signed volume between the surface and the reference plane (m³).
    pub raw_volume_m3: f64,
    /// Horizontal area of the integrated region (m²).
    pub area_m2: f64,
    /// Number of raster cells in the integrated region.
    pub pixel_count: u64,
}

impl VolumeFeature {
    /// Create a feature from a signed raw volume, with no region detail.
    pub fn from_volume(raw_volume_m3: f64) -> Self {
        Self {
            raw_volume_m3,
            area_m2: 0.0,
            pixel_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_request_defaults_nodata() {
        let request = ClipRequest::new("dem.tif", "heap.shp", "clipped.tif");
        assert_eq!(request.nodata, DEFAULT_NODATA);
        assert_eq!(request.source, PathBuf::from("dem.tif"));
        assert_eq!(request.output, PathBuf::from("clipped.tif"));
    }

    #[test]
    fn test_band_statistics_range() {
        let stats = BandStatistics {
            minimum: 102.5,
            maximum: 147.5,
        };
        assert_eq!(stats.range(), 45.0);
    }

    #[test]
    fn test_surface_handle_path() {
        let surface = SurfaceHandle::new("/tmp/clipped.tif");
        assert_eq!(surface.path(), Path::new("/tmp/clipped.tif"));
    }
}
