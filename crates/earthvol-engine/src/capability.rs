//! The geoprocessing capability trait.

use crate::{BandStatistics, ClipRequest, Result, SurfaceHandle, VolumeFeature};

/// Operations the survey pipeline requires from a geoprocessing engine.
///
/// Implementations are expected to be synchronous and are invoked strictly
/// sequentially; no concurrency guarantee is assumed for repeated calls
/// against the same surface.
pub trait GeoProcessing {
    /// Crop a raster to a polygon boundary, preserving resolution.
    ///
    /// Returns a handle to the clipped artifact. Fails with
    /// [`ClipFailed`](crate::EngineError::ClipFailed) when the mask is empty
    /// or invalid, or the raster has no overlap with it.
    fn clip(&self, request: &ClipRequest) -> Result<SurfaceHandle>;

    /// Read the elevation extrema of one band of a surface.
    ///
    /// Band numbers start at 1. Fails with
    /// [`InvalidSurface`](crate::EngineError::InvalidSurface) when the
    /// surface has no valid pixels.
    fn band_statistics(&self, surface: &SurfaceHandle, band: u32) -> Result<BandStatistics>;

    /// Integrate the surface against a horizontal plane at `level`.
    ///
    /// Returns one signed raw volume per contiguous region. An empty vector
    /// means the engine produced no data at this level; callers treat that
    /// as a valid, sample-free result rather than an error.
    fn volume_at_level(
        &self,
        surface: &SurfaceHandle,
        band: u32,
        level: f64,
    ) -> Result<Vec<VolumeFeature>>;
}
