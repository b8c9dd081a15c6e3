#![forbid(unsafe_code)]

//! Pinch gesture samples and the handler contract a UI dispatcher drives.
//!
//! A platform gesture recognizer reports a cumulative scale factor (1.0 = the
//! fingers have not moved since the gesture began) together with a phase.
//! Phases for one gesture always arrive as
//! `Began → Changed* → (Ended | Cancelled)`.
//!
//! [`PinchGestureHandler`] is the seam between that dispatcher and whatever
//! reacts to the pinch. Implementors provide the three reactions; the
//! provided [`handle_sample`](PinchGestureHandler::handle_sample) routes a
//! raw sample to the right one.

use crate::trace;

/// Lifecycle phase of a pinch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Fingers touched down; the scale is 1.0.
    Began,
    /// The fingers moved; the scale is cumulative since `Began`.
    Changed,
    /// The fingers lifted normally.
    Ended,
    /// The system took the gesture away (incoming call, competing recognizer).
    Cancelled,
}

impl GesturePhase {
    /// Whether this phase closes the gesture.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }

    /// Lowercase name, as used in logs and gesture scripts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Began => "began",
            Self::Changed => "changed",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether `next` may directly follow `self` within a gesture stream.
    ///
    /// A terminal phase may only be followed by the `Began` of the next gesture.
    #[must_use]
    pub const fn may_precede(self, next: Self) -> bool {
        match self {
            Self::Began | Self::Changed => !matches!(next, Self::Began),
            Self::Ended | Self::Cancelled => matches!(next, Self::Began),
        }
    }
}

impl std::fmt::Display for GesturePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sample from a pinch gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    /// Cumulative scale factor since the gesture began.
    pub scale: f64,
    /// Gesture phase at the time of the sample.
    pub phase: GesturePhase,
}

impl GestureSample {
    #[must_use]
    pub const fn new(scale: f64, phase: GesturePhase) -> Self {
        Self { scale, phase }
    }

    /// A `Began` sample. Recognizers always report 1.0 here.
    #[must_use]
    pub const fn began() -> Self {
        Self::new(1.0, GesturePhase::Began)
    }

    #[must_use]
    pub const fn changed(scale: f64) -> Self {
        Self::new(scale, GesturePhase::Changed)
    }

    #[must_use]
    pub const fn ended(scale: f64) -> Self {
        Self::new(scale, GesturePhase::Ended)
    }

    #[must_use]
    pub const fn cancelled(scale: f64) -> Self {
        Self::new(scale, GesturePhase::Cancelled)
    }
}

/// Reactions to the phases of a pinch gesture.
///
/// `Began` carries no information beyond "a pinch is starting", so handlers
/// are only asked about the other three phases.
pub trait PinchGestureHandler {
    /// What a handler reports back for each reaction.
    type Outcome;

    /// The cumulative scale changed.
    fn on_changed(&mut self, scale: f64) -> Self::Outcome;

    /// The fingers lifted.
    fn on_ended(&mut self) -> Self::Outcome;

    /// The gesture was taken away by the system.
    fn on_cancelled(&mut self) -> Self::Outcome;

    /// Route a raw sample to the matching reaction.
    ///
    /// Returns `None` for `Began`, which has no reaction.
    fn handle_sample(&mut self, sample: GestureSample) -> Option<Self::Outcome> {
        trace!(phase = sample.phase.as_str(), scale = sample.scale, "pinch sample");
        match sample.phase {
            GesturePhase::Began => None,
            GesturePhase::Changed => Some(self.on_changed(sample.scale)),
            GesturePhase::Ended => Some(self.on_ended()),
            GesturePhase::Cancelled => Some(self.on_cancelled()),
        }
    }
}
