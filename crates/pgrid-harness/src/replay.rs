#![forbid(unsafe_code)]

//! Drive a controller through a [`PinchScript`].
//!
//! Samples are dispatched in order through
//! [`PinchGestureHandler::handle_sample`]. After every terminal sample the
//! simulated host is ticked until its settle animation comes to rest (bounded
//! by `max_frames`), then the controller drains the completions it produced.

use std::time::Duration;

use pgrid_core::PinchGestureHandler;
use pgrid_runtime::{CompletionEvent, TransitionController, TransitionEvent};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::script::PinchScript;
use crate::simulated_host::SimulatedHost;

/// Everything a replay produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// Controller outcome for every non-`Began` sample, in order.
    #[serde(skip)]
    pub events: Vec<TransitionEvent>,
    /// Completions applied while settling, in order.
    #[serde(skip)]
    pub completions: Vec<CompletionEvent>,
    pub gestures: usize,
    pub samples: usize,
    /// Settle frames ticked across the whole replay.
    pub frames: usize,
    pub final_index: usize,
    pub final_columns: u16,
    pub sessions_started: u64,
    pub committed: u64,
    pub reverted: u64,
    pub begin_rejected: u64,
    pub invalid_samples: u64,
    pub stale_completions: u64,
    pub awaiting_completion: u64,
    pub peak_in_flight_sessions: usize,
}

impl ReplayReport {
    /// Indices the catalog moved through, one per committed completion.
    #[must_use]
    pub fn committed_path(&self) -> Vec<usize> {
        self.completions
            .iter()
            .filter_map(|c| match c {
                CompletionEvent::Committed { to_index, .. } => Some(*to_index),
                _ => None,
            })
            .collect()
    }
}

/// Replay `script` against `controller`, settling after each gesture.
pub fn replay(
    controller: &mut TransitionController<SimulatedHost>,
    script: &PinchScript,
    frame: Duration,
    max_frames: usize,
) -> ReplayReport {
    let _span = info_span!("pinch.replay", samples = script.len()).entered();
    let mut report = ReplayReport {
        gestures: script.gesture_count(),
        samples: script.len(),
        ..ReplayReport::default()
    };

    for sample in script {
        if let Some(event) = controller.handle_sample(*sample) {
            debug!(phase = %sample.phase, scale = sample.scale, ?event, "replayed sample");
            report.events.push(event);
        }
        if sample.phase.is_terminal() {
            report.frames += controller.host_mut().settle_until_idle(frame, max_frames);
            report.completions.extend(controller.pump_completions());
        }
    }

    let stats = controller.stats();
    report.final_index = controller.current_index();
    report.final_columns = controller.current_layout().columns();
    report.sessions_started = stats.sessions_started;
    report.committed = stats.committed;
    report.reverted = stats.reverted;
    report.begin_rejected = stats.begin_rejected;
    report.invalid_samples = stats.invalid_samples;
    report.stale_completions = stats.stale_completions;
    report.awaiting_completion = stats.awaiting_completion;
    report.peak_in_flight_sessions = stats.peak_in_flight_sessions;
    report
}
