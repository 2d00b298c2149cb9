//! Reference-level sequencing for the volume sweep.
//!
//! A sweep evaluates cut/fill volumes at evenly spaced elevations between
//! the minimum and maximum of the clipped surface. The sequence must start
//! at the minimum and must never stop short of the maximum, so the final
//! level is the first sweep position at or above the maximum.
//!
//! Levels are computed as `minimum + i * step` rather than by repeated
//! addition, and iteration is bounded by a count fixed at construction, so
//! float rounding can neither drift the spacing nor prevent termination.

use earthvol_engine::BandStatistics;
use thiserror::Error;

/// Errors from constructing a level sweep.
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    /// The step increment must be a strictly positive, finite number.
    #[error("invalid step {0}: must be a positive, finite number")]
    InvalidStep(f64),

    /// The range endpoints must be finite numbers.
    #[error("invalid elevation range: minimum {minimum}, maximum {maximum}")]
    InvalidRange {
        /// Minimum as reported by the statistics query.
        minimum: f64,
        /// Maximum as reported by the statistics query.
        maximum: f64,
    },
}

/// Elevation extrema of a surface, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRange {
    /// Minimum elevation (m).
    pub minimum: f64,
    /// Maximum elevation (m).
    pub maximum: f64,
}

impl ElevationRange {
    /// Create a range from explicit extrema.
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }

    /// Elevation difference between the extrema (m).
    pub fn span(&self) -> f64 {
        self.maximum - self.minimum
    }
}

impl From<BandStatistics> for ElevationRange {
    fn from(stats: BandStatistics) -> Self {
        Self {
            minimum: stats.minimum,
            maximum: stats.maximum,
        }
    }
}

/// How the sweep step is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepPolicy {
    /// A fixed increment in meters.
    Explicit(f64),
    /// One tenth of the elevation range. This is the default.
    TenthOfRange,
}

impl Default for StepPolicy {
    fn default() -> Self {
        StepPolicy::TenthOfRange
    }
}

impl StepPolicy {
    /// Resolve the policy to a concrete step for the given range.
    ///
    /// An explicit step must be positive and finite. A flat range resolves
    /// `TenthOfRange` to 1.0 m: any positive step produces the same
    /// single-level sweep there, and a derived step of zero would be
    /// invalid.
    pub fn resolve(&self, range: &ElevationRange) -> Result<f64, LevelError> {
        match *self {
            StepPolicy::Explicit(step) => {
                if step.is_finite() && step > 0.0 {
                    Ok(step)
                } else {
                    Err(LevelError::InvalidStep(step))
                }
            }
            StepPolicy::TenthOfRange => {
                let span = range.span();
                if span > 0.0 {
                    Ok(span / 10.0)
                } else {
                    Ok(1.0)
                }
            }
        }
    }
}

/// The ordered, finite sequence of reference levels for one sweep.
///
/// Produced levels start at the range minimum and advance by `step`; the
/// final level is the first sweep position at or above the range maximum,
/// so the maximum is always covered, with minimal overshoot.
///
/// The sweep is an exact-size iterator and is `Clone`; cloning before
/// iterating restarts the sequence, which is a pure function of its inputs.
///
/// A reversed range (`maximum < minimum`) yields an empty sweep; a flat
/// range yields exactly one level, the minimum itself.
#[derive(Debug, Clone)]
pub struct LevelSweep {
    start: f64,
    step: f64,
    count: usize,
    index: usize,
}

impl LevelSweep {
    /// Build the level sequence for `range` at the given `step`.
    ///
    /// Fails fast with [`LevelError::InvalidStep`] for a non-positive or
    /// non-finite step, and with [`LevelError::InvalidRange`] for
    /// non-finite range endpoints; neither can produce an unbounded or
    /// NaN-valued sequence.
    pub fn new(range: ElevationRange, step: f64) -> Result<Self, LevelError> {
        if !range.minimum.is_finite() || !range.maximum.is_finite() {
            return Err(LevelError::InvalidRange {
                minimum: range.minimum,
                maximum: range.maximum,
            });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(LevelError::InvalidStep(step));
        }

        let span = range.span();
        let count = if span < 0.0 {
            0
        } else {
            // Steps needed to reach the maximum, plus the level at the
            // minimum itself. If division rounded down far enough that the
            // last level still sits below the maximum, add one more: the
            // sweep must never stop short of the maximum.
            let mut count = ((span / step).ceil() as usize).saturating_add(1);
            if range.minimum + (count - 1) as f64 * step < range.maximum {
                count = count.saturating_add(1);
            }
            count
        };

        Ok(Self {
            start: range.minimum,
            step,
            count,
            index: 0,
        })
    }

    /// The step between consecutive levels (m).
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of levels remaining in the sweep.
    pub fn len(&self) -> usize {
        self.count - self.index
    }

    /// Whether the sweep has no levels remaining.
    pub fn is_empty(&self) -> bool {
        self.index >= self.count
    }
}

impl Iterator for LevelSweep {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.count {
            return None;
        }
        let level = self.start + self.index as f64 * self.step;
        self.index += 1;
        Some(level)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LevelSweep {}
