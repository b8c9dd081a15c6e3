#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pgrid_harness::SimulatedHost;
use pgrid_layout::LayoutCatalog;
use pgrid_runtime::TransitionController;

#[derive(Debug, Arbitrary)]
enum Op {
    /// Scale as a signed log2 in 1/64 octave steps.
    Changed(i16),
    RawScale(f64),
    Ended,
    Cancelled,
    Tick(u8),
    Abort,
}

#[derive(Debug, Arbitrary)]
struct Input {
    columns: Vec<u8>,
    initial: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let columns: Vec<u16> = input
        .columns
        .iter()
        .take(16)
        .map(|c| u16::from(*c % 24) + 1)
        .collect();
    if columns.is_empty() {
        return;
    }
    let initial = usize::from(input.initial) % columns.len();
    let Ok(catalog) = LayoutCatalog::from_columns(&columns, 390.0, 1.0, initial) else {
        return;
    };
    let len = catalog.len();
    let host = SimulatedHost::new(*catalog.current());
    let mut c = TransitionController::new(catalog, host);

    for op in input.ops.iter().take(256) {
        let before = c.current_index();
        let live = c.active_session();
        match *op {
            Op::Changed(steps) => {
                c.on_gesture_changed((f64::from(steps) / 64.0).exp2());
            }
            Op::RawScale(scale) => {
                c.on_gesture_changed(scale);
            }
            Op::Ended => {
                c.on_gesture_ended();
            }
            Op::Cancelled => {
                c.on_gesture_cancelled();
            }
            Op::Tick(frames) => {
                for _ in 0..frames {
                    c.host_mut().tick(Duration::from_millis(16));
                }
                c.pump_completions();
            }
            Op::Abort => {
                c.host_mut().abort();
            }
        }

        assert!(c.in_flight_sessions() <= 1);
        assert!(c.current_index() < len);
        if live.is_some() && c.active_session() == live {
            assert_eq!(c.current_index(), before, "index moved under a live session");
        }
    }

    let stats = c.stats();
    assert!(stats.peak_in_flight_sessions <= 1);
    assert_eq!(stats.begin_rejected, 0);
    assert_eq!(stats.stale_completions, 0);
});
