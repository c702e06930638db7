// Host-side tests for the web front-end's tuning constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn dom_ids_are_distinct() {
    let ids = [
        CANVAS_ID,
        PANELS_ID,
        LABELS_ID,
        MODEL_STATUS_ID,
        IMPORT_STATUS_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn pointer_tuning_is_sane() {
    assert!(DRAG_THRESHOLD_PX > 0.0);
    assert!(PICK_RADIUS_SCALE >= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn helper_line_colour_is_normalized() {
    assert!(HELPER_LINE_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
    assert!(GRID_LINE_ALPHA > 0.0 && GRID_LINE_ALPHA <= 1.0);
}
