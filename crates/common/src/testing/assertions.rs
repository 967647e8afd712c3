//! Custom assertions for numeric results

/// Assert that two floating point values are approximately equal
///
/// # Examples
///
/// ```
/// use vsme_common::testing::assert_approx_eq;
///
/// assert_approx_eq(0.1 + 0.2, 0.3, 1e-9);
/// ```
#[track_caller]
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff < epsilon,
        "Values not approximately equal: {} vs {} (diff: {})",
        actual,
        expected,
        diff
    );
}

/// Assert that `actual` is within `tolerance` (a fraction) of `expected`
///
/// Emission totals span many orders of magnitude, so a relative tolerance is
/// usually the better check.
#[track_caller]
pub fn assert_relative_eq(actual: f64, expected: f64, tolerance: f64) {
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    let relative = (actual - expected).abs() / scale;
    assert!(
        relative <= tolerance,
        "Values differ by {:.6} (relative), allowed {}: {} vs {}",
        relative,
        tolerance,
        actual,
        expected
    );
}
