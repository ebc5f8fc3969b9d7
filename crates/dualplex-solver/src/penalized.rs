use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, Neg};

use crate::numeric::{is_below_zero, is_zero};

/// A real value plus a symbolic multiple of an arbitrarily large constant M.
///
/// Used for the objective and the known terms. The `penalty` part always
/// dominates: `(-1000, 0) > (0, -1)` no matter how large the real part is.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Penalized {
    /// Finite contribution
    pub real: f64,
    /// Coefficient of M
    pub penalty: f64,
}

impl Penalized {
    /// The marker placed in the known term of an injected repair row: exactly `M`.
    pub const REPAIR_MARKER: Penalized = Penalized { real: 0.0, penalty: 1.0 };

    pub const ZERO: Penalized = Penalized { real: 0.0, penalty: 0.0 };

    pub fn new(real: f64, penalty: f64) -> Self {
        Self { real, penalty }
    }

    pub fn real(real: f64) -> Self {
        Self { real, penalty: 0.0 }
    }

    /// Negative under the big-M order: a negative penalty, or a zero penalty
    /// with a negative real part.
    pub fn is_negative(&self, tolerance: f64) -> bool {
        is_below_zero(self.penalty, tolerance)
            || (is_zero(self.penalty, tolerance) && is_below_zero(self.real, tolerance))
    }

    /// Tolerant total order, penalty first then real part.
    pub fn compare(&self, other: &Penalized, tolerance: f64) -> Ordering {
        let dp = self.penalty - other.penalty;
        if !is_zero(dp, tolerance) {
            return if dp < 0.0 { Ordering::Less } else { Ordering::Greater };
        }
        let dr = self.real - other.real;
        if is_zero(dr, tolerance) {
            Ordering::Equal
        } else if dr < 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl From<f64> for Penalized {
    fn from(real: f64) -> Self {
        Self::real(real)
    }
}

impl Add for Penalized {
    type Output = Penalized;

    fn add(self, rhs: Penalized) -> Penalized {
        Penalized {
            real: self.real + rhs.real,
            penalty: self.penalty + rhs.penalty,
        }
    }
}

impl AddAssign for Penalized {
    fn add_assign(&mut self, rhs: Penalized) {
        self.real += rhs.real;
        self.penalty += rhs.penalty;
    }
}

impl Mul<Penalized> for f64 {
    type Output = Penalized;

    fn mul(self, rhs: Penalized) -> Penalized {
        Penalized {
            real: self * rhs.real,
            penalty: self * rhs.penalty,
        }
    }
}

impl Div<f64> for Penalized {
    type Output = Penalized;

    fn div(self, rhs: f64) -> Penalized {
        Penalized {
            real: self.real / rhs,
            penalty: self.penalty / rhs,
        }
    }
}

impl DivAssign<f64> for Penalized {
    fn div_assign(&mut self, rhs: f64) {
        self.real /= rhs;
        self.penalty /= rhs;
    }
}

impl Neg for Penalized {
    type Output = Penalized;

    fn neg(self) -> Penalized {
        Penalized {
            real: -self.real,
            penalty: -self.penalty,
        }
    }
}

impl fmt::Display for Penalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.penalty == 0.0 {
            write!(f, "{}", self.real)
        } else if self.real == 0.0 {
            write!(f, "{}M", self.penalty)
        } else if self.penalty > 0.0 {
            write!(f, "{} + {}M", self.real, self.penalty)
        } else {
            write!(f, "{} - {}M", self.real, -self.penalty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::DEFAULT_TOLERANCE;

    #[test]
    fn test_penalty_dominates_order() {
        let big_real = Penalized::real(-1.0e9);
        let small_m = Penalized::new(0.0, -0.5);
        assert_eq!(small_m.compare(&big_real, DEFAULT_TOLERANCE), Ordering::Less);
        assert_eq!(
            Penalized::REPAIR_MARKER.compare(&Penalized::real(1.0e12), DEFAULT_TOLERANCE),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_falls_back_to_real() {
        let a = Penalized::new(-3.0, 1.0);
        let b = Penalized::new(-2.0, 1.0);
        assert_eq!(a.compare(&b, DEFAULT_TOLERANCE), Ordering::Less);
        assert_eq!(a.compare(&(a + Penalized::real(1e-9)), DEFAULT_TOLERANCE), Ordering::Equal);
    }

    #[test]
    fn test_is_negative() {
        assert!(Penalized::real(-2.0).is_negative(DEFAULT_TOLERANCE));
        assert!(Penalized::new(100.0, -1.0).is_negative(DEFAULT_TOLERANCE));
        assert!(!Penalized::new(-100.0, 1.0).is_negative(DEFAULT_TOLERANCE));
        assert!(!Penalized::real(-1e-9).is_negative(DEFAULT_TOLERANCE));
        assert!(!Penalized::REPAIR_MARKER.is_negative(DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_arithmetic() {
        let mut x = Penalized::new(2.0, 4.0);
        x /= 2.0;
        assert_eq!(x, Penalized::new(1.0, 2.0));
        x += -3.0 * Penalized::REPAIR_MARKER;
        assert_eq!(x, Penalized::new(1.0, -1.0));
        assert_eq!(-x, Penalized::new(-1.0, 1.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Penalized::real(1.5).to_string(), "1.5");
        assert_eq!(Penalized::new(0.0, 2.0).to_string(), "2M");
        assert_eq!(Penalized::new(1.0, -2.0).to_string(), "1 - 2M");
        assert_eq!(Penalized::new(1.0, 2.0).to_string(), "1 + 2M");
    }
}
