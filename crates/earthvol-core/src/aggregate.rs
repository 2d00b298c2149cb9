//! Volume classification and level-sweep aggregation.
//!
//! [`sweep_volumes`] drives the engine once per reference level, strictly in
//! sequence order, and folds the raw per-feature volumes into an ordered
//! table. Classification decomposes each signed raw volume into separate
//! non-negative fill and cut components; downstream consumers rely on the
//! two columns, not just the signed net value.

use crate::levels::LevelSweep;
use earthvol_engine::{EngineError, GeoProcessing, SurfaceHandle};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, warn};

/// Cubic meters per cubic kilometer.
pub const CUBIC_METERS_PER_CUBIC_KILOMETER: f64 = 1_000_000_000.0;

/// Errors that abort a sweep in progress.
///
/// A single level failing is not among them: per-level failures are
/// recorded as [`SkippedLevel`] diagnostics and the sweep continues.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The engine is unreachable or misconfigured for the whole run.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The cancel flag was set between levels.
    #[error("sweep cancelled")]
    Cancelled,
}

/// Cut/fill volumes for one feature at one reference level.
///
/// Volumes are in cubic kilometers. `fill_km3` and `cut_km3` are both
/// non-negative and at most one of them is nonzero; `net_km3` is always
/// their difference. The serde field names are the exported CSV column
/// headers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSample {
    /// Reference level this sample was evaluated at (m).
    #[serde(rename = "Level (m)")]
    pub level: f64,
    /// Volume of terrain above the reference level (km³).
    #[serde(rename = "Fill Volume (km³)")]
    pub fill_km3: f64,
    /// Volume of terrain below the reference level (km³).
    #[serde(rename = "Cut Volume (km³)")]
    pub cut_km3: f64,
    /// `fill_km3 - cut_km3` (km³).
    #[serde(rename = "Net Volume (km³)")]
    pub net_km3: f64,
}

impl VolumeSample {
    /// Classify a signed raw volume (m³) into its fill/cut decomposition.
    ///
    /// Positive raw volume is fill, negative is cut, zero is neither; the
    /// nonzero component is converted to km³ and the other is exactly zero.
    pub fn classify(level: f64, raw_volume_m3: f64) -> Self {
        let (fill_km3, cut_km3) = if raw_volume_m3 > 0.0 {
            (raw_volume_m3 / CUBIC_METERS_PER_CUBIC_KILOMETER, 0.0)
        } else if raw_volume_m3 < 0.0 {
            (0.0, raw_volume_m3.abs() / CUBIC_METERS_PER_CUBIC_KILOMETER)
        } else {
            (0.0, 0.0)
        };

        Self {
            level,
            fill_km3,
            cut_km3,
            net_km3: fill_km3 - cut_km3,
        }
    }
}

/// Ordered table of volume samples.
///
/// Insertion order is (level order, then feature order within a level);
/// the table is created fresh per run and never mutated after the
/// aggregation completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeTable {
    samples: Vec<VolumeSample>,
}

impl VolumeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, preserving insertion order.
    pub fn push(&mut self, sample: VolumeSample) {
        self.samples.push(sample);
    }

    /// The samples in table order.
    pub fn samples(&self) -> &[VolumeSample] {
        &self.samples
    }

    /// Number of samples in the table.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the table has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<'a> IntoIterator for &'a VolumeTable {
    type Item = &'a VolumeSample;
    type IntoIter = std::slice::Iter<'a, VolumeSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Diagnostic for a level the engine failed to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLevel {
    /// The level that was skipped (m).
    pub level: f64,
    /// Engine-reported reason.
    pub reason: String,
}

/// Outcome of one sweep: the table plus diagnostics for skipped levels.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Samples for every level the engine answered, in sweep order.
    pub table: VolumeTable,
    /// Levels the engine failed on, in sweep order.
    pub skipped: Vec<SkippedLevel>,
}

/// Drive the engine at every level of the sweep and build the result table.
///
/// Levels are evaluated strictly in sequence order. A level the engine
/// fails on is recorded in the report's `skipped` list and the sweep
/// continues; only an engine that reports itself
/// [unavailable](EngineError::Unavailable) aborts the run. The optional
/// `cancel` flag is checked between levels.
///
/// The surface is borrowed read-only for the duration of the sweep and is
/// never mutated.
pub fn sweep_volumes<E>(
    engine: &E,
    surface: &SurfaceHandle,
    band: u32,
    sweep: LevelSweep,
    cancel: Option<&AtomicBool>,
) -> Result<SweepReport, SweepError>
where
    E: GeoProcessing + ?Sized,
{
    let mut report = SweepReport::default();

    for level in sweep {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(SweepError::Cancelled);
            }
        }

        match engine.volume_at_level(surface, band, level) {
            Ok(features) => {
                if features.is_empty() {
                    debug!(level, "no volume data at level");
                }
                for feature in features {
                    let sample = VolumeSample::classify(level, feature.raw_volume_m3);
                    debug!(
                        level,
                        raw_volume_m3 = feature.raw_volume_m3,
                        net_km3 = sample.net_km3,
                        "classified feature"
                    );
                    report.table.push(sample);
                }
            }
            Err(EngineError::Unavailable(reason)) => {
                return Err(SweepError::EngineUnavailable(reason));
            }
            Err(err) => {
                warn!(level, error = %err, "skipping level: volume query failed");
                report.skipped.push(SkippedLevel {
                    level,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(report)
}
