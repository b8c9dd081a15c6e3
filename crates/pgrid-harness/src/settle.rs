#![forbid(unsafe_code)]

//! Settle animation for released transitions.
//!
//! Once a pinch is released the host animates the remaining distance on its
//! own: to 1.0 on finish, back to 0.0 on cancel. [`SettleSpring`] is a damped
//! harmonic oscillator over transition progress:
//!
//!   a = -stiffness × (position - target) - damping × velocity
//!
//! integrated with semi-implicit Euler in steps of at most 4ms. A single
//! `advance` simulates at most one second; longer frames are clamped.
//!
//! # Invariants
//!
//! 1. `value()` is the position clamped to [0.0, 1.0].
//! 2. Once at rest the spring stays at rest and reports exactly `target`.
//! 3. Default damping is critical (`2√k`), so progress does not overshoot.

use std::time::Duration;

/// Maximum dt per integration step.
const MAX_STEP_SECS: f64 = 0.004;
/// Longest span one `advance` call simulates.
const MAX_ADVANCE_SECS: f64 = 1.0;

const DEFAULT_STIFFNESS: f64 = 170.0;
const DEFAULT_REST_THRESHOLD: f64 = 0.001;
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.01;
const MIN_STIFFNESS: f64 = 0.1;

/// Spring carrying transition progress to its resting value.
#[derive(Debug, Clone)]
pub struct SettleSpring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl SettleSpring {
    /// Critically damped spring from `from` toward `target`.
    #[must_use]
    pub fn new(from: f64, target: f64) -> Self {
        Self {
            position: from,
            velocity: 0.0,
            target,
            stiffness: DEFAULT_STIFFNESS,
            damping: 2.0 * DEFAULT_STIFFNESS.sqrt(),
            at_rest: false,
        }
    }

    /// Set stiffness (builder pattern), keeping damping critical.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self.damping = 2.0 * self.stiffness.sqrt();
        self
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Position clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.position.clamp(0.0, 1.0)
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    fn step(&mut self, dt: f64) {
        let acceleration =
            -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt` (clamped to one second), subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let secs = dt.as_secs_f64().min(MAX_ADVANCE_SECS);
        if secs <= 0.0 {
            return;
        }
        // At most MAX_ADVANCE_SECS / MAX_STEP_SECS steps.
        let steps = (secs / MAX_STEP_SECS).ceil().max(1.0) as u32;
        let step_dt = secs / f64::from(steps);
        for _ in 0..steps {
            self.step(step_dt);
        }

        if (self.position - self.target).abs() < DEFAULT_REST_THRESHOLD
            && self.velocity.abs() < DEFAULT_VELOCITY_THRESHOLD
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
