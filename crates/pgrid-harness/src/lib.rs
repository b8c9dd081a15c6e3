#![forbid(unsafe_code)]

//! Test harness for PinchGrid.
//!
//! - [`SimulatedHost`]: a deterministic [`HostSurface`](pgrid_runtime::HostSurface)
//!   with a frame clock, settle animation, and call log.
//! - [`blend`]: linear interpolation of item geometry between two layouts.
//! - [`script`]: compact textual pinch gestures, validated for phase order.
//! - [`replay`]: drive a controller through a script, settling the host after
//!   every gesture.

pub mod blend;
pub mod replay;
pub mod script;
pub mod settle;
pub mod simulated_host;

pub use replay::{ReplayReport, replay};
pub use script::{PinchScript, ScriptError};
pub use settle::SettleSpring;
pub use simulated_host::{HostCall, SimulatedHandle, SimulatedHost};
