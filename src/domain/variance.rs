//! Percentage deviation of a current value from its baseline.

/// Compute `((current - original) / original) * 100`.
///
/// A zero baseline is not guarded: the result is `NaN` when `current_value`
/// is also zero and an infinity otherwise.
pub fn variance(original_value: f64, current_value: f64) -> f64 {
    ((current_value - original_value) / original_value) * 100.0
}
