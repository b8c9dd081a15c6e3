#![forbid(unsafe_code)]

//! Compact textual pinch gestures.
//!
//! A script is a sequence of steps separated by `;` or newlines. Each step is
//! a phase name optionally followed by a scale:
//!
//! ```text
//! began; changed 1.4; changed 2.0; ended
//! began
//! changed 0.6
//! cancelled
//! ```
//!
//! `began` defaults to 1.0. `ended` and `cancelled` default to the last scale
//! of their gesture. `changed` always needs a scale. Lines starting with `#`
//! are comments.
//!
//! Parsing validates phase order: every gesture is
//! `Began → Changed* → (Ended | Cancelled)` and the script must not stop
//! mid-gesture.

use std::fmt;
use std::str::FromStr;

use pgrid_core::{GesturePhase, GestureSample};

/// Why a script was rejected. Step numbers are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("script contains no steps")]
    Empty,

    #[error("step {step}: unknown phase `{token}`")]
    UnknownPhase { step: usize, token: String },

    #[error("step {step}: `{token}` is not a scale")]
    InvalidScale { step: usize, token: String },

    #[error("step {step}: `changed` needs a scale")]
    MissingScale { step: usize },

    #[error("step {step}: unexpected `{token}` after the scale")]
    TrailingInput { step: usize, token: String },

    #[error("step {step}: `{next}` cannot follow {}", .previous.map_or("the start of the script", GesturePhase::as_str))]
    OutOfOrder {
        step: usize,
        previous: Option<GesturePhase>,
        next: GesturePhase,
    },

    #[error("script ends mid-gesture")]
    Unterminated,
}

fn parse_phase(token: &str) -> Option<GesturePhase> {
    match token.to_ascii_lowercase().as_str() {
        "began" | "begin" => Some(GesturePhase::Began),
        "changed" | "change" => Some(GesturePhase::Changed),
        "ended" | "end" => Some(GesturePhase::Ended),
        "cancelled" | "canceled" | "cancel" => Some(GesturePhase::Cancelled),
        _ => None,
    }
}

/// A validated sequence of pinch samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PinchScript {
    samples: Vec<GestureSample>,
}

impl PinchScript {
    /// Parse and validate script text.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut samples = Vec::new();
        let mut last_scale = 1.0;

        let steps = text
            .split(['\n', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.starts_with('#'));

        for (i, step_text) in steps.enumerate() {
            let step = i + 1;
            let mut tokens = step_text.split_whitespace();
            let Some(phase_token) = tokens.next() else {
                continue;
            };
            let phase = parse_phase(phase_token).ok_or_else(|| ScriptError::UnknownPhase {
                step,
                token: phase_token.to_owned(),
            })?;

            let scale = match tokens.next() {
                Some(token) => token.parse::<f64>().map_err(|_| ScriptError::InvalidScale {
                    step,
                    token: token.to_owned(),
                })?,
                None => match phase {
                    GesturePhase::Began => 1.0,
                    GesturePhase::Changed => return Err(ScriptError::MissingScale { step }),
                    GesturePhase::Ended | GesturePhase::Cancelled => last_scale,
                },
            };
            if let Some(extra) = tokens.next() {
                return Err(ScriptError::TrailingInput {
                    step,
                    token: extra.to_owned(),
                });
            }

            last_scale = if phase.is_terminal() { 1.0 } else { scale };
            samples.push(GestureSample::new(scale, phase));
        }

        Self::from_samples(samples)
    }

    /// Validate an already-built sample sequence.
    pub fn from_samples(samples: Vec<GestureSample>) -> Result<Self, ScriptError> {
        if samples.is_empty() {
            return Err(ScriptError::Empty);
        }

        let mut previous: Option<GesturePhase> = None;
        for (i, sample) in samples.iter().enumerate() {
            let allowed = match previous {
                None => sample.phase == GesturePhase::Began,
                Some(prev) => prev.may_precede(sample.phase),
            };
            if !allowed {
                return Err(ScriptError::OutOfOrder {
                    step: i + 1,
                    previous,
                    next: sample.phase,
                });
            }
            previous = Some(sample.phase);
        }

        if previous.is_some_and(|p| !p.is_terminal()) {
            return Err(ScriptError::Unterminated);
        }
        Ok(Self { samples })
    }

    #[must_use]
    pub fn samples(&self) -> &[GestureSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of complete gestures.
    #[must_use]
    pub fn gesture_count(&self) -> usize {
        self.samples.iter().filter(|s| s.phase.is_terminal()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureSample> {
        self.samples.iter()
    }
}

impl FromStr for PinchScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PinchScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sample) in self.samples.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", sample.phase, sample.scale)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PinchScript {
    type Item = &'a GestureSample;
    type IntoIter = std::slice::Iter<'a, GestureSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
