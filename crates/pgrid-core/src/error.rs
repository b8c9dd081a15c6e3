//! Error taxonomy for pinch-driven layout transitions.
//!
//! None of these are fatal. A failed sample means "the gesture had no visual
//! effect this time"; the controller logs it and keeps its prior state.

use thiserror::Error;

/// Why a host surface declined to start an interactive transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The geometry engine is still animating another transition.
    #[error("host surface is busy with another transition")]
    Busy,

    /// The host refused for a host-specific reason.
    #[error("host surface rejected the transition: {reason}")]
    Rejected { reason: String },
}

impl HostError {
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Errors produced while feeding gesture samples to a transition controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    /// The pinch scale was not a finite, strictly positive number.
    #[error("invalid pinch scale {scale}: must be finite and greater than zero")]
    InvalidInput { scale: f64 },

    /// The host surface could not begin the transition.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A gesture ended or was cancelled while no session was open.
    #[error("no active transition session")]
    NoActiveSession,
}

impl TransitionError {
    /// Benign errors are expected during normal use and need no attention.
    #[must_use]
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NoActiveSession)
    }
}
