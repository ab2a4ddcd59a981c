//! Assertions over difference-test results.

use k3d_core::{Accumulator, Tolerance};

/// Assert that every exact test recorded in `result` passed.
pub fn assert_exact(result: &Accumulator) {
    assert!(
        result.is_exact(),
        "expected exact equality, {} exact tests recorded at least one mismatch",
        result.exact_count()
    );
}

/// Assert that at least one exact test recorded in `result` failed.
pub fn assert_not_exact(result: &Accumulator) {
    assert!(
        !result.is_exact(),
        "expected a difference, all {} exact tests passed",
        result.exact_count()
    );
}

/// Assert that `result` passes under `tolerance`.
pub fn assert_approximately_equal(result: &Accumulator, tolerance: &Tolerance) {
    assert!(
        result.approximately_equal(tolerance),
        "not approximately equal: exact={}, max ulps {} > {} over {} samples",
        result.is_exact(),
        result.max_ulps(),
        tolerance.max_ulps,
        result.ulps_count()
    );
}
