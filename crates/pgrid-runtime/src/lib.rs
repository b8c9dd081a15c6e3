#![forbid(unsafe_code)]

//! Runtime: the interactive pinch transition controller.
//!
//! # Role in PinchGrid
//! `pgrid-runtime` owns the [`TransitionController`] state machine that turns
//! pinch samples into begin/progress/finish/cancel instructions for a
//! [`HostSurface`], and applies the host's completion messages to the
//! [`LayoutCatalog`](pgrid_layout::LayoutCatalog).
//!
//! # Primary responsibilities
//! - **HostSurface**: the contract a geometry engine implements.
//! - **CompletionQueue**: explicit completion messages instead of captured
//!   closures; the target index travels inside the message.
//! - **TransitionController**: `Idle`/`Active` session state, commit threshold,
//!   resolution and staleness guards.
//! - **TransitionPolicy**: tunables, optionally loaded from TOML or JSON.

pub mod controller;
pub mod host;
pub mod policy_config;

pub use controller::{
    CompletionEvent, DEFAULT_COMMIT_THRESHOLD, TransitionController, TransitionEvent,
    TransitionStats, progress_for_scale,
};
pub use host::{
    CompletionNotifier, CompletionQueue, HostSurface, SessionId, TransitionCompletion,
};
pub use policy_config::{PolicyConfigError, TransitionPolicy};
