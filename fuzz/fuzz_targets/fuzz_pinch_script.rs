#![no_main]

use libfuzzer_sys::fuzz_target;
use pgrid_harness::PinchScript;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(script) = PinchScript::parse(text) else {
        return;
    };

    // Accepted scripts are non-empty, well-ordered, and closed.
    assert!(!script.is_empty());
    assert_eq!(script.samples()[0].phase, pgrid_core::GesturePhase::Began);
    assert!(script.samples()[script.len() - 1].phase.is_terminal());
    for pair in script.samples().windows(2) {
        assert!(pair[0].phase.may_precede(pair[1].phase));
    }
    assert!(script.gesture_count() >= 1);
});
