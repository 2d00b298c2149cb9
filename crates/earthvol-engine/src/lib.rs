//! # earthvol-engine
//!
//! Typed contract with the external geoprocessing engine.
//!
//! The survey pipeline delegates all raster work to an engine that provides
//! three operations: clipping a raster to a polygon mask, reading band
//! statistics, and integrating the surface against a horizontal plane at a
//! reference level. This crate defines that contract (the [`GeoProcessing`]
//! trait, the request/result types it exchanges, and the [`EngineError`]
//! taxonomy) without implementing any of the operations itself.
//!
//! Engine implementations live elsewhere (`earthvol-qgis` drives the
//! `qgis_process` tool); test suites substitute small scripted engines.
//!
//! # Example
//!
//! ```no_run
//! use earthvol_engine::{ClipRequest, GeoProcessing};
//!
//! fn clipped_range<E: GeoProcessing>(engine: &E, request: &ClipRequest) -> Result<f64, earthvol_engine::EngineError> {
//!     let surface = engine.clip(request)?;
//!     let stats = engine.band_statistics(&surface, 1)?;
//!     Ok(stats.maximum - stats.minimum)
//! }
//! ```

mod capability;
mod error;
mod types;

pub use capability::GeoProcessing;
pub use error::EngineError;
pub use types::{BandStatistics, ClipRequest, SurfaceHandle, VolumeFeature, DEFAULT_NODATA};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
