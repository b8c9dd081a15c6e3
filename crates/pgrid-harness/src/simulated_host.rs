#![forbid(unsafe_code)]

//! Deterministic host surface.
//!
//! [`SimulatedHost`] stands in for a real collection view. It displays one
//! layout at rest, runs at most one interactive transition at a time, and
//! settles released transitions with a [`SettleSpring`] driven by an explicit
//! frame clock ([`tick`](SimulatedHost::tick)). No wall-clock time is involved,
//! so every run is reproducible.
//!
//! # Invariants
//!
//! 1. At most one transition is in flight; `begin` while one is in flight
//!    fails with [`HostError::Busy`].
//! 2. Each transition's notifier fires exactly once: when its settle spring
//!    comes to rest, or on [`abort`](SimulatedHost::abort).
//! 3. The displayed layout changes only when a finished transition settles.
//! 4. Progress pushed after release is ignored; the spring owns it.

use std::time::Duration;

use pgrid_core::HostError;
use pgrid_layout::{ItemFrame, LayoutDescriptor};
use pgrid_runtime::{CompletionNotifier, HostSurface, SessionId};
use tracing::{debug, trace};

use crate::blend::{blend_content_height, blend_frames};
use crate::settle::SettleSpring;

/// One recorded call into, or notification from, the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Begin { session: SessionId, columns: u16 },
    Refused { columns: u16, error: HostError },
    SetProgress { session: SessionId, progress: f64 },
    Finish { session: SessionId },
    Cancel { session: SessionId },
    Complete { session: SessionId, finished: bool },
}

/// Handle to the simulated host's in-flight transition.
#[derive(Debug, PartialEq, Eq)]
pub struct SimulatedHandle {
    session: SessionId,
}

impl SimulatedHandle {
    #[must_use]
    pub fn session(&self) -> SessionId {
        self.session
    }
}

#[derive(Debug)]
struct Settle {
    spring: SettleSpring,
    commit: bool,
}

#[derive(Debug)]
struct InFlight {
    session: SessionId,
    from: LayoutDescriptor,
    to: LayoutDescriptor,
    progress: f64,
    notifier: CompletionNotifier,
    settle: Option<Settle>,
}

/// Frame-clocked stand-in for a collection view's transition engine.
#[derive(Debug)]
pub struct SimulatedHost {
    displayed: LayoutDescriptor,
    in_flight: Option<InFlight>,
    refuse_next: Option<HostError>,
    instant_settle: bool,
    settle_stiffness: Option<f64>,
    calls: Vec<HostCall>,
}

impl SimulatedHost {
    /// A host at rest on `displayed`.
    #[must_use]
    pub fn new(displayed: LayoutDescriptor) -> Self {
        Self {
            displayed,
            in_flight: None,
            refuse_next: None,
            instant_settle: false,
            settle_stiffness: None,
            calls: Vec::new(),
        }
    }

    /// Settle released transitions inside `finish`/`cancel` (builder pattern).
    ///
    /// Completion is still delivered through the notifier, so the controller
    /// sees it on its next pump.
    #[must_use]
    pub fn with_instant_settle(mut self) -> Self {
        self.instant_settle = true;
        self
    }

    /// Settle spring stiffness (builder pattern). Higher settles faster.
    #[must_use]
    pub fn with_settle_stiffness(mut self, stiffness: f64) -> Self {
        self.settle_stiffness = Some(stiffness);
        self
    }

    /// Make the next `begin` fail with `error`.
    pub fn refuse_next_begin(&mut self, error: HostError) {
        self.refuse_next = Some(error);
    }

    /// Layout shown when no transition is in flight.
    #[must_use]
    pub fn displayed(&self) -> &LayoutDescriptor {
        &self.displayed
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the in-flight transition has been released and is settling.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|f| f.settle.is_some())
    }

    /// Progress of the in-flight transition.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.in_flight.as_ref().map(|f| f.progress)
    }

    /// Every call and notification so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Number of transitions the host accepted.
    #[must_use]
    pub fn begin_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Begin { .. }))
            .count()
    }

    /// Item geometry as it would be drawn right now.
    #[must_use]
    pub fn frames(&self, item_count: usize) -> Vec<ItemFrame> {
        match &self.in_flight {
            Some(f) => blend_frames(&f.from, &f.to, f.progress, item_count),
            None => self.displayed.frames(item_count),
        }
    }

    /// Scrollable height as it would be laid out right now.
    #[must_use]
    pub fn content_height(&self, item_count: usize) -> f64 {
        match &self.in_flight {
            Some(f) => blend_content_height(&f.from, &f.to, f.progress, item_count),
            None => self.displayed.content_height(item_count),
        }
    }

    /// Advance the frame clock. Returns `true` if a transition completed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(flight) = self.in_flight.as_mut() else {
            return false;
        };
        let Some(settle) = flight.settle.as_mut() else {
            return false;
        };

        settle.spring.advance(dt);
        flight.progress = settle.spring.value();
        if settle.spring.is_at_rest() {
            let commit = settle.commit;
            self.complete(commit);
            return true;
        }
        false
    }

    /// Tick until no transition is settling, at most `max_frames` times.
    ///
    /// Returns the number of frames ticked.
    pub fn settle_until_idle(&mut self, frame: Duration, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.is_settling() && frames < max_frames {
            self.tick(frame);
            frames += 1;
        }
        frames
    }

    /// Drop the in-flight transition, reporting `finished = false`.
    ///
    /// Returns `true` if there was one.
    pub fn abort(&mut self) -> bool {
        if self.in_flight.is_none() {
            return false;
        }
        self.complete(false);
        true
    }

    fn complete(&mut self, finished: bool) {
        let Some(flight) = self.in_flight.take() else {
            return;
        };
        if finished {
            self.displayed = flight.to;
        }
        debug!(session = %flight.session, finished, "simulated transition completed");
        self.calls.push(HostCall::Complete {
            session: flight.session,
            finished,
        });
        flight.notifier.notify(finished);
    }

    fn release(&mut self, handle: SimulatedHandle, commit: bool) {
        let Some(flight) = self
            .in_flight
            .as_mut()
            .filter(|f| f.session == handle.session && f.settle.is_none())
        else {
            trace!(session = %handle.session, "release for unknown transition");
            return;
        };

        let target = if commit { 1.0 } else { 0.0 };
        let mut spring = SettleSpring::new(flight.progress, target);
        if let Some(k) = self.settle_stiffness {
            spring = spring.with_stiffness(k);
        }
        flight.settle = Some(Settle { spring, commit });

        if self.instant_settle {
            self.complete(commit);
        }
    }
}

impl HostSurface for SimulatedHost {
    type Handle = SimulatedHandle;

    fn begin_interactive_transition(
        &mut self,
        target: &LayoutDescriptor,
        notifier: CompletionNotifier,
    ) -> Result<SimulatedHandle, HostError> {
        let refusal = match self.refuse_next.take() {
            Some(error) => Some(error),
            None if self.in_flight.is_some() => Some(HostError::Busy),
            None => None,
        };
        if let Some(error) = refusal {
            self.calls.push(HostCall::Refused {
                columns: target.columns(),
                error: error.clone(),
            });
            return Err(error);
        }

        let session = notifier.session();
        self.calls.push(HostCall::Begin {
            session,
            columns: target.columns(),
        });
        self.in_flight = Some(InFlight {
            session,
            from: self.displayed,
            to: *target,
            progress: 0.0,
            notifier,
            settle: None,
        });
        Ok(SimulatedHandle { session })
    }

    fn set_progress(&mut self, handle: &mut SimulatedHandle, progress: f64) {
        if let Some(flight) = self
            .in_flight
            .as_mut()
            .filter(|f| f.session == handle.session && f.settle.is_none())
        {
            flight.progress = progress.clamp(0.0, 1.0);
            self.calls.push(HostCall::SetProgress {
                session: handle.session,
                progress: flight.progress,
            });
        }
    }

    fn finish(&mut self, handle: SimulatedHandle) {
        self.calls.push(HostCall::Finish {
            session: handle.session,
        });
        self.release(handle, true);
    }

    fn cancel(&mut self, handle: SimulatedHandle) {
        self.calls.push(HostCall::Cancel {
            session: handle.session,
        });
        self.release(handle, false);
    }
}
