#![forbid(unsafe_code)]

//! Log-scale mapping from a pinch scale to a layout index and a progress.
//!
//! A pinch reports a multiplicative scale, so equal "amounts" of pinching in
//! and out differ by a factor, not an offset. Working in `log2(scale)` makes
//! them symmetric: doubling and halving are `+1` and `-1`.
//!
//! # Target index
//!
//! With `delta = floor(log_scale)`:
//!
//! ```text
//! log_scale < 0   proposed = current + delta
//! log_scale >= 0  proposed = current + delta + 1
//! ```
//!
//! so any move at all proposes the neighbouring layout, and each further
//! octave moves one more step. Proposals equal to `current`, outside the
//! catalog, or made at exactly `log_scale == 0` are `None`.
//!
//! # Progress
//!
//! `clamp(|log_scale|, 0, 1)`: a full octave (2× or 0.5×) is a complete
//! transition; pinching further has no additional effect.
//!
//! # Invariants
//!
//! 1. All functions are pure and deterministic.
//! 2. `target_index` never returns `Some(current)` and never returns an
//!    index `>= catalog_len`.
//! 3. `progress` is in [0.0, 1.0], non-decreasing in `|log_scale|`.
//!
//! # Failure Modes
//!
//! - Non-positive or non-finite scale: [`log_scale`] returns
//!   [`TransitionError::InvalidInput`]. Recognizers never produce these.

use crate::error::TransitionError;
use crate::trace;

/// Octaves of pinching that take progress from 0.0 to 1.0.
pub const FULL_TRANSITION_OCTAVES: f64 = 1.0;

/// Convert a pinch scale to its base-2 logarithm.
pub fn log_scale(scale: f64) -> Result<f64, TransitionError> {
    if !scale.is_finite() || scale <= 0.0 {
        trace!(scale, "rejected pinch scale");
        return Err(TransitionError::InvalidInput { scale });
    }
    Ok(scale.log2())
}

/// Candidate layout index for `log_scale`, or `None` if the gesture does not
/// propose a different, existing layout.
#[must_use]
pub fn target_index(log_scale: f64, current_index: usize, catalog_len: usize) -> Option<usize> {
    if !log_scale.is_finite() || log_scale == 0.0 {
        return None;
    }

    // Saturating float-to-int cast; huge scales just run off the catalog.
    let delta = log_scale.floor() as i64;
    let step = if log_scale < 0.0 {
        delta
    } else {
        delta.saturating_add(1)
    };

    let current = i64::try_from(current_index).ok()?;
    let proposed = current.saturating_add(step);
    if proposed == current {
        return None;
    }

    let proposed = usize::try_from(proposed).ok()?;
    (proposed < catalog_len).then_some(proposed)
}

/// Transition progress for `log_scale`, in [0.0, 1.0].
#[inline]
#[must_use]
pub fn progress(log_scale: f64) -> f64 {
    if log_scale.is_nan() {
        return 0.0;
    }
    (log_scale.abs() / FULL_TRANSITION_OCTAVES).clamp(0.0, 1.0)
}

/// Everything the mapper derives from one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleReading {
    /// `log2(scale)`.
    pub log_scale: f64,
    /// Proposed layout index, if any.
    pub target: Option<usize>,
    /// Transition progress in [0.0, 1.0].
    pub progress: f64,
}

impl ScaleReading {
    /// Evaluate a raw pinch scale against the catalog position.
    pub fn evaluate(
        scale: f64,
        current_index: usize,
        catalog_len: usize,
    ) -> Result<Self, TransitionError> {
        let log_scale = log_scale(scale)?;
        Ok(Self {
            log_scale,
            target: target_index(log_scale, current_index, catalog_len),
            progress: progress(log_scale),
        })
    }
}
