//! Error types for engine operations.

use thiserror::Error;

/// Errors reported by a geoprocessing engine.
///
/// [`EngineError::Unavailable`] is systemic: the engine is missing or
/// misconfigured for the entire run, and callers abort on it. Every other
/// variant describes a single failed operation; during a sweep, a failed
/// volume query is recorded and skipped rather than aborting.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The raster could not be clipped to the mask polygon (empty or
    /// invalid mask, or no overlap with the raster).
    #[error("clip failed: {reason}")]
    ClipFailed {
        /// Engine-reported reason.
        reason: String,
    },

    /// The surface has no valid pixels to compute statistics from.
    #[error("invalid surface: {reason}")]
    InvalidSurface {
        /// Engine-reported reason.
        reason: String,
    },

    /// A volume query failed for a single reference level.
    #[error("volume query failed at level {level}: {reason}")]
    LevelQuery {
        /// The reference level the query was made at (m).
        level: f64,
        /// Engine-reported reason.
        reason: String,
    },

    /// The engine is unreachable or misconfigured for the entire run.
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// I/O error talking to the engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
