//! Property-based invariant tests for the pinch scale mapper.
//!
//! 1. A proposal is never the current index and never out of bounds
//! 2. Pinching out by just over `k` octaves proposes `current + k + 1`
//! 3. Pinching in proposes an index below the current one
//! 4. Progress is bounded, monotone in |log_scale|, and saturates at one octave
//! 5. Valid scales never error; invalid ones always do

use pgrid_core::TransitionError;
use pgrid_core::scale::{ScaleReading, log_scale, progress, target_index};
use proptest::prelude::*;

fn positive_scale() -> impl Strategy<Value = f64> {
    // Roughly 2^-20 .. 2^20, log-uniform.
    (-20.0f64..20.0).prop_map(f64::exp2)
}

proptest! {
    #[test]
    fn proposal_is_distinct_and_in_bounds(
        scale in positive_scale(),
        len in 1usize..32,
        current_seed in any::<usize>(),
    ) {
        let current = current_seed % len;
        let ls = log_scale(scale).unwrap();
        if let Some(target) = target_index(ls, current, len) {
            prop_assert_ne!(target, current);
            prop_assert!(target < len);
        }
    }

    #[test]
    fn pinch_out_by_k_octaves(k in 0u32..6, frac in 0.001f64..0.999, current in 0usize..16) {
        let len = 32;
        let ls = f64::from(k) + frac;
        let expected = current + k as usize + 1;
        let got = target_index(ls, current, len);
        if expected < len {
            prop_assert_eq!(got, Some(expected));
        } else {
            prop_assert_eq!(got, None);
        }
    }

    #[test]
    fn pinch_in_moves_down(ls in -8.0f64..-0.0001, current in 0usize..16) {
        if let Some(target) = target_index(ls, current, 16) {
            prop_assert!(target < current);
        }
    }

    #[test]
    fn progress_bounded_and_monotone(a in -4.0f64..4.0, b in -4.0f64..4.0) {
        let (pa, pb) = (progress(a), progress(b));
        prop_assert!((0.0..=1.0).contains(&pa));
        if a.abs() <= b.abs() {
            prop_assert!(pa <= pb);
        }
        if a.abs() >= 1.0 {
            prop_assert_eq!(pa, 1.0);
        }
    }

    #[test]
    fn valid_scales_evaluate(scale in positive_scale(), current in 0usize..7) {
        prop_assert!(ScaleReading::evaluate(scale, current, 7).is_ok());
    }

    #[test]
    fn non_positive_scales_fail(scale in -1e6f64..=0.0) {
        let is_invalid_input = matches!(
            log_scale(scale),
            Err(TransitionError::InvalidInput { .. })
        );
        prop_assert!(is_invalid_input);
    }
}
