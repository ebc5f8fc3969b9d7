//! Tolerance-aware comparisons.
//!
//! Every magnitude test on an accumulated value goes through one of these.
//! Raw `==` is only used on constants the solver writes itself.

/// Default tolerance for floating point comparisons
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[inline]
pub fn is_zero(value: f64, tolerance: f64) -> bool {
    value.abs() < tolerance
}

#[inline]
pub fn is_below_zero(value: f64, tolerance: f64) -> bool {
    value < -tolerance
}

#[inline]
pub fn is_above_zero(value: f64, tolerance: f64) -> bool {
    value > tolerance
}
