#![forbid(unsafe_code)]

//! Interactive pinch transition controller.
//!
//! [`TransitionController`] owns the layout catalog and a host surface, and
//! turns pinch samples into host instructions.
//!
//! # State Machine
//!
//! ```text
//! Idle   --changed, target proposed, host begins-->  Active
//! Idle   --changed, no target / host refuses----->   Idle
//! Active --changed---------------------------->      Active   (progress only)
//! Active --ended | cancelled------------------>      Idle     (finish if progress > threshold, else cancel)
//! Idle   --ended | cancelled------------------>      Idle     (no-op)
//! ```
//!
//! # Invariants
//!
//! 1. At most one session is in flight, counting both the live session and a
//!    released one still awaiting its completion. `SessionState` alone bounds
//!    live sessions at one; the pending check in `on_gesture_changed` extends
//!    the bound to sessions the host is still settling.
//! 2. A session's target index is fixed when it opens; later samples only
//!    change its progress.
//! 3. `current_index` changes only when a completion reporting
//!    `finished = true` is applied, and never while a session is live.
//! 4. Every session is closed exactly once: by end/cancel, or by its own
//!    completion if the host settles it first.
//!
//! # Failure Modes
//!
//! - Invalid scale: logged, counted, state unchanged.
//! - Host refuses to begin: logged, counted, stays `Idle`. The next sample
//!   retries naturally.
//! - Completion for an unknown session: logged as stale and ignored.

use pgrid_core::scale::{self, ScaleReading};
use pgrid_core::{PinchGestureHandler, TransitionError};
use pgrid_layout::{LayoutCatalog, LayoutDescriptor};
use tracing::{debug, debug_span, info, warn};

use crate::host::{CompletionQueue, HostSurface, SessionId, TransitionCompletion};

/// Progress above which releasing the pinch commits the transition.
pub const DEFAULT_COMMIT_THRESHOLD: f64 = 0.5;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a gesture entry point did.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEvent {
    /// Sample had no effect (at rest, or no layout in that direction).
    Ignored,
    /// A session opened toward `target_index`, already fed this sample's progress.
    SessionStarted {
        session: SessionId,
        target_index: usize,
        progress: f64,
    },
    /// The live session's progress was updated.
    ProgressUpdated { session: SessionId, progress: f64 },
    /// Gesture released past the threshold; the host was told to finish.
    Committing {
        session: SessionId,
        target_index: usize,
        progress: f64,
    },
    /// Gesture released at or below the threshold; the host was told to cancel.
    Reverting {
        session: SessionId,
        target_index: usize,
        progress: f64,
    },
    /// The host refused to begin a session toward `target_index`.
    BeginRejected {
        target_index: usize,
        error: TransitionError,
    },
    /// The sample's scale was unusable.
    InvalidSample { error: TransitionError },
    /// End or cancel arrived with no live session.
    NoActiveSession,
    /// A target was proposed, but the previous session has not reported back yet.
    AwaitingCompletion { pending: SessionId },
}

/// What applying a completion message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEvent {
    /// The target became the current layout.
    Committed {
        session: SessionId,
        from_index: usize,
        to_index: usize,
    },
    /// The original layout stayed current.
    Reverted {
        session: SessionId,
        target_index: usize,
    },
    /// The message did not match any session the controller knows about.
    Stale { session: SessionId },
}

/// Counters over the controller's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionStats {
    pub sessions_started: u64,
    pub committed: u64,
    pub reverted: u64,
    pub begin_rejected: u64,
    pub invalid_samples: u64,
    pub stale_completions: u64,
    /// Proposed targets held back because a released session had not reported back.
    pub awaiting_completion: u64,
    /// Most sessions in flight (live or awaiting completion) when one opened.
    pub peak_in_flight_sessions: usize,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

struct TransitionSession<Hd> {
    id: SessionId,
    target_index: usize,
    progress: f64,
    handle: Hd,
}

enum SessionState<Hd> {
    Idle,
    Active(TransitionSession<Hd>),
}

/// A session that was finished or cancelled and awaits its completion.
#[derive(Debug, Clone, Copy)]
struct PendingResolution {
    session: SessionId,
    target_index: usize,
}

// ---------------------------------------------------------------------------
// TransitionController
// ---------------------------------------------------------------------------

/// Drives pinch-controlled transitions between the layouts of a catalog.
pub struct TransitionController<H: HostSurface> {
    catalog: LayoutCatalog,
    host: H,
    state: SessionState<H::Handle>,
    pending: Option<PendingResolution>,
    completions: CompletionQueue,
    commit_threshold: f64,
    next_session: u64,
    stats: TransitionStats,
}

impl<H: HostSurface> std::fmt::Debug for TransitionController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionController")
            .field("current_index", &self.catalog.current_index())
            .field("active_session", &self.active_session())
            .field("pending", &self.pending)
            .field("commit_threshold", &self.commit_threshold)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<H: HostSurface> TransitionController<H> {
    /// Create an idle controller over `catalog`, driving `host`.
    #[must_use]
    pub fn new(catalog: LayoutCatalog, host: H) -> Self {
        Self {
            catalog,
            host,
            state: SessionState::Idle,
            pending: None,
            completions: CompletionQueue::new(),
            commit_threshold: DEFAULT_COMMIT_THRESHOLD,
            next_session: 1,
            stats: TransitionStats::default(),
        }
    }

    /// Set the commit threshold (builder pattern). Clamped to [0.0, 1.0].
    #[must_use]
    pub fn with_commit_threshold(mut self, threshold: f64) -> Self {
        self.commit_threshold = if threshold.is_nan() {
            DEFAULT_COMMIT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    // -- Read access --------------------------------------------------------

    /// Index of the layout displayed at rest.
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.catalog.current_index()
    }

    #[inline]
    #[must_use]
    pub fn current_layout(&self) -> &LayoutDescriptor {
        self.catalog.current()
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &LayoutCatalog {
        &self.catalog
    }

    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for driving its animation clock.
    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[inline]
    #[must_use]
    pub fn commit_threshold(&self) -> f64 {
        self.commit_threshold
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> TransitionStats {
        self.stats
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// Number of live sessions. `SessionState` holds at most one.
    #[inline]
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        usize::from(self.is_active())
    }

    /// Sessions the host has begun and not yet reported: live plus pending.
    #[inline]
    #[must_use]
    pub fn in_flight_sessions(&self) -> usize {
        self.live_sessions() + usize::from(self.pending.is_some())
    }

    #[must_use]
    pub fn active_session(&self) -> Option<SessionId> {
        match &self.state {
            SessionState::Active(s) => Some(s.id),
            SessionState::Idle => None,
        }
    }

    #[must_use]
    pub fn active_target(&self) -> Option<usize> {
        match &self.state {
            SessionState::Active(s) => Some(s.target_index),
            SessionState::Idle => None,
        }
    }

    #[must_use]
    pub fn active_progress(&self) -> Option<f64> {
        match &self.state {
            SessionState::Active(s) => Some(s.progress),
            SessionState::Idle => None,
        }
    }

    /// Session that was released and has not reported back yet.
    #[must_use]
    pub fn pending_resolution(&self) -> Option<SessionId> {
        self.pending.map(|p| p.session)
    }

    /// Whether nothing is live and nothing is waiting on the host.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_active() && self.pending.is_none()
    }

    // -- Gesture entry points ----------------------------------------------

    /// The pinch's cumulative scale changed.
    pub fn on_gesture_changed(&mut self, scale: f64) -> TransitionEvent {
        self.pump_completions();

        let reading =
            match ScaleReading::evaluate(scale, self.catalog.current_index(), self.catalog.len()) {
                Ok(reading) => reading,
                Err(error) => {
                    warn!(scale, %error, "ignoring pinch sample");
                    self.stats.invalid_samples += 1;
                    return TransitionEvent::InvalidSample { error };
                }
            };

        if let SessionState::Active(session) = &mut self.state {
            // Target stays fixed; only progress follows the fingers.
            session.progress = reading.progress;
            self.host.set_progress(&mut session.handle, reading.progress);
            debug!(
                session = %session.id,
                target = session.target_index,
                progress = reading.progress,
                "transition progress"
            );
            return TransitionEvent::ProgressUpdated {
                session: session.id,
                progress: reading.progress,
            };
        }

        let Some(target_index) = reading.target else {
            return TransitionEvent::Ignored;
        };

        if let Some(pending) = self.pending {
            debug!(
                pending = %pending.session,
                target = target_index,
                "previous transition still settling"
            );
            self.stats.awaiting_completion += 1;
            return TransitionEvent::AwaitingCompletion {
                pending: pending.session,
            };
        }

        self.open_session(target_index, reading.progress)
    }

    /// The pinch ended normally.
    pub fn on_gesture_ended(&mut self) -> TransitionEvent {
        self.resolve("ended")
    }

    /// The pinch was cancelled by the system.
    pub fn on_gesture_cancelled(&mut self) -> TransitionEvent {
        self.resolve("cancelled")
    }

    // -- Completion handling -----------------------------------------------

    /// Apply every completion the host has delivered so far.
    pub fn pump_completions(&mut self) -> Vec<CompletionEvent> {
        let mut applied = Vec::new();
        while let Some(completion) = self.completions.try_next() {
            applied.push(self.on_transition_complete(completion));
        }
        applied
    }

    /// Apply one completion message.
    pub fn on_transition_complete(&mut self, completion: TransitionCompletion) -> CompletionEvent {
        let TransitionCompletion {
            session,
            target_index,
            finished,
        } = completion;

        if self.pending.is_some_and(|p| p.session == session) {
            self.pending = None;
        } else if self.active_session() == Some(session) {
            // The host settled the live session on its own; drop the handle.
            warn!(%session, finished, "host completed a session that was still live");
            self.state = SessionState::Idle;
        } else {
            warn!(%session, target = target_index, "ignoring stale completion");
            self.stats.stale_completions += 1;
            return CompletionEvent::Stale { session };
        }

        if !finished {
            info!(%session, target = target_index, "transition reverted");
            self.stats.reverted += 1;
            return CompletionEvent::Reverted {
                session,
                target_index,
            };
        }

        match self.catalog.commit_index(target_index) {
            Ok(from_index) => {
                info!(%session, from = from_index, to = target_index, "transition committed");
                self.stats.committed += 1;
                CompletionEvent::Committed {
                    session,
                    from_index,
                    to_index: target_index,
                }
            }
            Err(error) => {
                warn!(%session, %error, "completion named a layout outside the catalog");
                self.stats.stale_completions += 1;
                CompletionEvent::Stale { session }
            }
        }
    }

    // -- Internals ---------------------------------------------------------

    fn open_session(&mut self, target_index: usize, progress: f64) -> TransitionEvent {
        let Some(target) = self.catalog.get(target_index).copied() else {
            return TransitionEvent::Ignored;
        };

        let id = SessionId::new(self.next_session);
        self.next_session += 1;
        let _span = debug_span!("pinch.session", session = %id, target = target_index).entered();

        let notifier = self.completions.notifier(id, target_index);
        let mut handle = match self.host.begin_interactive_transition(&target, notifier) {
            Ok(handle) => handle,
            Err(error) => {
                warn!(%error, columns = target.columns(), "host refused to begin transition");
                self.stats.begin_rejected += 1;
                return TransitionEvent::BeginRejected {
                    target_index,
                    error: error.into(),
                };
            }
        };

        self.host.set_progress(&mut handle, progress);
        self.state = SessionState::Active(TransitionSession {
            id,
            target_index,
            progress,
            handle,
        });
        self.stats.sessions_started += 1;
        self.stats.peak_in_flight_sessions = self
            .stats
            .peak_in_flight_sessions
            .max(self.in_flight_sessions());
        debug!(
            from = self.catalog.current_index(),
            columns = target.columns(),
            progress,
            "transition session opened"
        );

        TransitionEvent::SessionStarted {
            session: id,
            target_index,
            progress,
        }
    }

    fn resolve(&mut self, reason: &'static str) -> TransitionEvent {
        self.pump_completions();

        let session = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => return TransitionEvent::NoActiveSession,
            SessionState::Active(session) => session,
        };

        let TransitionSession {
            id,
            target_index,
            progress,
            handle,
        } = session;
        let _span = debug_span!("pinch.session", session = %id, target = target_index).entered();

        self.pending = Some(PendingResolution {
            session: id,
            target_index,
        });

        if progress > self.commit_threshold {
            info!(reason, progress, "finishing transition");
            self.host.finish(handle);
            TransitionEvent::Committing {
                session: id,
                target_index,
                progress,
            }
        } else {
            info!(reason, progress, "cancelling transition");
            self.host.cancel(handle);
            TransitionEvent::Reverting {
                session: id,
                target_index,
                progress,
            }
        }
    }
}

impl<H: HostSurface> PinchGestureHandler for TransitionController<H> {
    type Outcome = TransitionEvent;

    fn on_changed(&mut self, scale: f64) -> TransitionEvent {
        self.on_gesture_changed(scale)
    }

    fn on_ended(&mut self) -> TransitionEvent {
        self.on_gesture_ended()
    }

    fn on_cancelled(&mut self) -> TransitionEvent {
        self.on_gesture_cancelled()
    }
}

/// Progress a given pinch scale maps to, for callers that preview decisions.
#[must_use]
pub fn progress_for_scale(scale: f64) -> Option<f64> {
    scale::log_scale(scale).ok().map(scale::progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CompletionNotifier;
    use pgrid_core::{GestureSample, HostError};

    const COLUMNS: [u16; 7] = [17, 11, 9, 7, 5, 3, 1];

    /// Host that records calls and completes synchronously when told to.
    #[derive(Default)]
    struct ScriptedHost {
        refuse: Option<HostError>,
        notifier: Option<CompletionNotifier>,
        calls: Vec<String>,
        begins: usize,
    }

    impl ScriptedHost {
        fn complete(&mut self, finished: bool) {
            if let Some(n) = self.notifier.take() {
                n.notify(finished);
            }
        }
    }

    impl HostSurface for ScriptedHost {
        type Handle = u16;

        fn begin_interactive_transition(
            &mut self,
            target: &LayoutDescriptor,
            notifier: CompletionNotifier,
        ) -> Result<u16, HostError> {
            if let Some(err) = self.refuse.take() {
                return Err(err);
            }
            self.begins += 1;
            self.calls.push(format!("begin {}", target.columns()));
            self.notifier = Some(notifier);
            Ok(target.columns())
        }

        fn set_progress(&mut self, _handle: &mut u16, progress: f64) {
            self.calls.push(format!("progress {progress:.2}"));
        }

        fn finish(&mut self, handle: u16) {
            self.calls.push(format!("finish {handle}"));
        }

        fn cancel(&mut self, handle: u16) {
            self.calls.push(format!("cancel {handle}"));
        }
    }

    fn controller() -> TransitionController<ScriptedHost> {
        let catalog = LayoutCatalog::from_columns(&COLUMNS, 390.0, 1.0, 2).unwrap();
        TransitionController::new(catalog, ScriptedHost::default())
    }

    #[test]
    fn starts_idle() {
        let c = controller();
        assert!(!c.is_active());
        assert!(c.is_settled());
        assert_eq!(c.current_index(), 2);
        assert_eq!(c.commit_threshold(), 0.5);
    }

    #[test]
    fn rest_sample_is_ignored() {
        let mut c = controller();
        assert_eq!(c.on_gesture_changed(1.0), TransitionEvent::Ignored);
        assert!(c.host().calls.is_empty());
    }

    #[test]
    fn first_move_opens_session_with_progress() {
        let mut c = controller();
        let event = c.on_gesture_changed(2.0);
        assert!(matches!(
            event,
            TransitionEvent::SessionStarted { target_index: 4, progress, .. } if progress == 1.0
        ));
        assert_eq!(c.active_target(), Some(4));
        assert_eq!(c.host().calls, vec!["begin 5", "progress 1.00"]);
    }

    #[test]
    fn target_is_fixed_for_the_session() {
        let mut c = controller();
        c.on_gesture_changed(1.2);
        assert_eq!(c.active_target(), Some(3));
        c.on_gesture_changed(0.3);
        c.on_gesture_changed(6.0);
        assert_eq!(c.active_target(), Some(3));
        assert_eq!(c.host().begins, 1);
    }

    #[test]
    fn end_above_threshold_commits_on_completion() {
        let mut c = controller();
        c.on_gesture_changed(2.0);
        let event = c.on_gesture_ended();
        assert!(matches!(event, TransitionEvent::Committing { target_index: 4, .. }));
        assert!(!c.is_active());
        assert_eq!(c.current_index(), 2, "index moves only on completion");

        c.host_mut().complete(true);
        let applied = c.pump_completions();
        assert!(matches!(
            applied.as_slice(),
            [CompletionEvent::Committed { from_index: 2, to_index: 4, .. }]
        ));
        assert_eq!(c.current_index(), 4);
        assert!(c.is_settled());
    }

    #[test]
    fn half_progress_reverts() {
        let mut c = controller();
        // log2(1/sqrt(2)) rounds to just under -0.5.
        c.on_gesture_changed(0.5f64.sqrt());
        let progress = c.active_progress().unwrap();
        assert!(progress <= 0.5 && (progress - 0.5).abs() < 1e-12);
        assert!(matches!(c.on_gesture_ended(), TransitionEvent::Reverting { .. }));
        c.host_mut().complete(false);
        c.pump_completions();
        assert_eq!(c.current_index(), 2);
        assert_eq!(c.stats().reverted, 1);
    }

    #[test]
    fn progress_equal_to_threshold_reverts() {
        let catalog = LayoutCatalog::from_columns(&COLUMNS, 390.0, 1.0, 2).unwrap();
        let mut c = TransitionController::new(catalog, ScriptedHost::default())
            .with_commit_threshold(1.0);
        c.on_gesture_changed(2.0);
        assert_eq!(c.active_progress(), Some(1.0));
        assert!(matches!(c.on_gesture_ended(), TransitionEvent::Reverting { .. }));
    }

    #[test]
    fn just_over_half_commits() {
        let mut c = controller();
        c.on_gesture_changed(0.51f64.exp2());
        assert!(matches!(c.on_gesture_ended(), TransitionEvent::Committing { target_index: 3, .. }));
        c.host_mut().complete(true);
        c.pump_completions();
        assert_eq!(c.current_index(), 3);
    }

    #[test]
    fn cancel_uses_the_same_threshold() {
        let mut c = controller();
        c.on_gesture_changed(0.25);
        assert!(matches!(c.on_gesture_cancelled(), TransitionEvent::Committing { .. }));
    }

    #[test]
    fn end_without_session_is_benign() {
        let mut c = controller();
        assert_eq!(c.on_gesture_ended(), TransitionEvent::NoActiveSession);
        assert_eq!(c.on_gesture_cancelled(), TransitionEvent::NoActiveSession);
    }

    #[test]
    fn host_refusal_keeps_idle_and_next_sample_retries() {
        let mut c = controller();
        c.host_mut().refuse = Some(HostError::Busy);
        let event = c.on_gesture_changed(1.5);
        assert_eq!(
            event,
            TransitionEvent::BeginRejected {
                target_index: 3,
                error: TransitionError::Host(HostError::Busy),
            }
        );
        assert!(!c.is_active());
        assert!(matches!(
            c.on_gesture_changed(1.6),
            TransitionEvent::SessionStarted { target_index: 3, .. }
        ));
        assert_eq!(c.stats().begin_rejected, 1);
    }

    #[test]
    fn invalid_scale_changes_nothing() {
        let mut c = controller();
        c.on_gesture_changed(1.5);
        let before = c.active_progress();
        let event = c.on_gesture_changed(-2.0);
        assert!(matches!(event, TransitionEvent::InvalidSample { .. }));
        assert_eq!(c.active_progress(), before);
        assert_eq!(c.stats().invalid_samples, 1);
    }

    #[test]
    fn new_session_waits_for_pending_completion() {
        let mut c = controller();
        c.on_gesture_changed(2.0);
        let TransitionEvent::Committing { session, .. } = c.on_gesture_ended() else {
            panic!("expected commit");
        };
        assert_eq!(
            c.on_gesture_changed(1.5),
            TransitionEvent::AwaitingCompletion { pending: session }
        );
        assert_eq!(c.in_flight_sessions(), 1);
        assert_eq!(c.stats().awaiting_completion, 1);

        c.host_mut().complete(true);
        assert!(matches!(
            c.on_gesture_changed(1.5),
            TransitionEvent::SessionStarted { target_index: 5, .. }
        ));
        assert_eq!(c.stats().peak_in_flight_sessions, 1);
        assert_eq!(c.stats().awaiting_completion, 1);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut c = controller();
        let bogus = TransitionCompletion {
            session: SessionId::new(99),
            target_index: 0,
            finished: true,
        };
        assert_eq!(
            c.on_transition_complete(bogus),
            CompletionEvent::Stale {
                session: SessionId::new(99)
            }
        );
        assert_eq!(c.current_index(), 2);
        assert_eq!(c.stats().stale_completions, 1);
    }

    #[test]
    fn host_settling_a_live_session_closes_it() {
        let mut c = controller();
        c.on_gesture_changed(1.5);
        c.host_mut().complete(false);
        assert_eq!(c.on_gesture_ended(), TransitionEvent::NoActiveSession);
        assert!(c.is_settled());
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn threshold_builder_clamps() {
        let catalog = LayoutCatalog::from_columns(&COLUMNS, 390.0, 1.0, 2).unwrap();
        let c = TransitionController::new(catalog, ScriptedHost::default())
            .with_commit_threshold(3.0);
        assert_eq!(c.commit_threshold(), 1.0);
    }

    #[test]
    fn dispatches_through_handler_trait() {
        let mut c = controller();
        assert_eq!(c.handle_sample(GestureSample::began()), None);
        assert!(matches!(
            c.handle_sample(GestureSample::changed(0.4)),
            Some(TransitionEvent::SessionStarted { target_index: 0, .. })
        ));
        assert!(matches!(
            c.handle_sample(GestureSample::ended(0.4)),
            Some(TransitionEvent::Committing { target_index: 0, .. })
        ));
    }

    #[test]
    fn preview_progress() {
        assert_eq!(progress_for_scale(2.0), Some(1.0));
        assert_eq!(progress_for_scale(0.0), None);
    }
}
