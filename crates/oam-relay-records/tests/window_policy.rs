// crates/oam-relay-records/tests/window_policy.rs
// ============================================================================
// Module: Window Policy Property-Based Tests
// Description: Property tests for the offset-ceiling fallback decision.
// Purpose: Pin the boundary between offset search and cursor scroll.
// ============================================================================

//! Property-based tests for the result-window policy.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use oam_relay_records::RESULT_WINDOW_CEILING;
use oam_relay_records::exceeds_result_window;
use proptest::prelude::*;

proptest! {
    #[test]
    fn scroll_is_chosen_exactly_when_the_window_exceeds_the_ceiling(
        from in 0_u64 .. 30_000,
        size in 0_u64 .. 30_000,
    ) {
        let expected = from + size > RESULT_WINDOW_CEILING;
        prop_assert_eq!(exceeds_result_window(from, size), expected);
    }

    #[test]
    fn huge_windows_never_overflow(from in any::<u64>(), size in any::<u64>()) {
        // Saturating arithmetic keeps the decision well-defined at u64::MAX.
        let expected = from.saturating_add(size) > RESULT_WINDOW_CEILING;
        prop_assert_eq!(exceeds_result_window(from, size), expected);
    }
}

#[test]
fn the_documented_boundary_holds() {
    assert!(!exceeds_result_window(1, 9_999));
    assert!(exceeds_result_window(2, 9_999));
    assert!(!exceeds_result_window(0, RESULT_WINDOW_CEILING));
    assert!(exceeds_result_window(1, RESULT_WINDOW_CEILING));
}
