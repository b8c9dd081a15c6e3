//! Logging shim.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported from
//! here (and from the crate root). Without it, same-named macros that expand
//! to nothing are exported instead, so call sites never need `cfg` guards.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, info_span, trace, warn};

/// Inert span returned by the no-op span macros.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Mirror of `tracing::Span::entered`.
    #[inline]
    #[must_use]
    pub fn entered(self) -> Self {
        self
    }

    /// Mirror of `tracing::Span::in_scope`.
    #[inline]
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        f()
    }
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug_span {
    ($($arg:tt)*) => {
        $crate::logging::NoopSpan
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info_span {
    ($($arg:tt)*) => {
        $crate::logging::NoopSpan
    };
}
