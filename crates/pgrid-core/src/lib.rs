#![forbid(unsafe_code)]

//! Core: pinch gesture samples, log-scale mapping, and shared error types.
//!
//! # Role in PinchGrid
//! `pgrid-core` is the input layer. It owns the normalized gesture sample
//! types, the pure scale mapper that turns a cumulative pinch scale into a
//! candidate layout index and a transition progress, and the error taxonomy
//! shared by the runtime and host implementations.
//!
//! # How it fits in the system
//! The runtime (`pgrid-runtime`) consumes [`gesture::GestureSample`] values,
//! evaluates them with [`scale`], and drives the host surface. Layout
//! geometry (`pgrid-layout`) is independent of input, so this crate has no
//! knowledge of columns or item frames, only of indices into a catalog.

pub mod error;
pub mod gesture;
pub mod logging;
pub mod scale;

pub use error::{HostError, TransitionError};
pub use gesture::{GesturePhase, GestureSample, PinchGestureHandler};
pub use scale::ScaleReading;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, info_span, trace, warn};
