#![forbid(unsafe_code)]

//! Host surface contract and completion messages.
//!
//! The host surface is whatever actually interpolates grid geometry between
//! two layouts. The controller only talks to it through [`HostSurface`]:
//! begin, push progress, finish or cancel. All of these are fire-and-forget;
//! the outcome comes back later as a [`TransitionCompletion`] message.
//!
//! # Completion delivery
//!
//! When a session begins, the controller mints a [`CompletionNotifier`] that
//! already carries the session id and target index, and hands it to the
//! host. The host consumes it exactly once with
//! [`notify`](CompletionNotifier::notify). The message lands in the
//! controller's [`CompletionQueue`], which is drained on the event thread
//! before the next sample is processed.
//!
//! # Failure Modes
//!
//! - Host refuses to begin: it returns `Err(HostError)` and drops the
//!   notifier unused. Nothing is queued.
//! - Controller dropped before completion: `notify` silently discards the
//!   message.

use std::sync::mpsc::{self, Receiver, Sender};

use pgrid_core::HostError;
use pgrid_layout::LayoutDescriptor;

/// Identifier of one interactive transition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of one session, reported by the host once its animation settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCompletion {
    /// Session the host was driving.
    pub session: SessionId,
    /// Catalog index the session targeted, fixed when it began.
    pub target_index: usize,
    /// `true` if the host ended up displaying the target layout.
    pub finished: bool,
}

/// One-shot sender for a session's completion.
#[derive(Debug)]
#[must_use = "a host must deliver the completion exactly once"]
pub struct CompletionNotifier {
    session: SessionId,
    target_index: usize,
    sender: Sender<TransitionCompletion>,
}

impl CompletionNotifier {
    #[inline]
    pub fn session(&self) -> SessionId {
        self.session
    }

    #[inline]
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Deliver the session's outcome. Consumes the notifier.
    pub fn notify(self, finished: bool) {
        let completion = TransitionCompletion {
            session: self.session,
            target_index: self.target_index,
            finished,
        };
        if self.sender.send(completion).is_err() {
            tracing::trace!(session = %self.session, "completion dropped: controller gone");
        }
    }
}

/// Mailbox of completion messages on the event thread.
#[derive(Debug)]
pub struct CompletionQueue {
    sender: Sender<TransitionCompletion>,
    receiver: Receiver<TransitionCompletion>,
}

impl CompletionQueue {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Mint the notifier for a session targeting `target_index`.
    pub fn notifier(&self, session: SessionId, target_index: usize) -> CompletionNotifier {
        CompletionNotifier {
            session,
            target_index,
            sender: self.sender.clone(),
        }
    }

    /// Next delivered completion, if any. Never blocks.
    #[must_use]
    pub fn try_next(&self) -> Option<TransitionCompletion> {
        self.receiver.try_recv().ok()
    }
}

impl Default for CompletionQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability that interpolates grid geometry between two layouts.
///
/// Implementations start from whatever layout they currently display.
pub trait HostSurface {
    /// Opaque handle to one in-flight interactive transition.
    type Handle;

    /// Start an interactive transition toward `target`.
    ///
    /// On success the host keeps `notifier` and fires it exactly once when the
    /// transition settles. On failure the notifier is dropped unused.
    fn begin_interactive_transition(
        &mut self,
        target: &LayoutDescriptor,
        notifier: CompletionNotifier,
    ) -> Result<Self::Handle, HostError>;

    /// Set the interpolation progress, in [0.0, 1.0].
    fn set_progress(&mut self, handle: &mut Self::Handle, progress: f64);

    /// Animate the rest of the way to the target, then report `finished = true`.
    fn finish(&mut self, handle: Self::Handle);

    /// Animate back to the original layout, then report `finished = false`.
    fn cancel(&mut self, handle: Self::Handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_carries_session_and_target() {
        let queue = CompletionQueue::new();
        let n = queue.notifier(SessionId::new(3), 5);
        assert_eq!(n.session(), SessionId::new(3));
        assert_eq!(n.target_index(), 5);
        n.notify(true);
        assert_eq!(
            queue.try_next(),
            Some(TransitionCompletion {
                session: SessionId::new(3),
                target_index: 5,
                finished: true,
            })
        );
        assert_eq!(queue.try_next(), None);
    }

    #[test]
    fn completions_arrive_in_send_order() {
        let queue = CompletionQueue::new();
        let a = queue.notifier(SessionId::new(1), 0);
        let b = queue.notifier(SessionId::new(2), 1);
        b.notify(false);
        a.notify(true);
        assert_eq!(queue.try_next().map(|c| c.session), Some(SessionId::new(2)));
        assert_eq!(queue.try_next().map(|c| c.session), Some(SessionId::new(1)));
    }

    #[test]
    fn notify_after_queue_dropped_is_silent() {
        let queue = CompletionQueue::new();
        let n = queue.notifier(SessionId::new(1), 0);
        drop(queue);
        n.notify(true);
    }

    #[test]
    fn session_id_display() {
        assert_eq!(SessionId::new(42).to_string(), "#42");
    }
}
