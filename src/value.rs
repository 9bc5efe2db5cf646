// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A scalar carrying a mean and a standard deviation, closed under the
//! arithmetic the method registry's callables need: the four basic
//! operations, integer/rational powers, and first-order uncorrelated error
//! propagation through an arbitrary differentiable map.
//!
//! `spec.md` treats this type as an external collaborator ("an
//! `UncertainValue` type ... is assumed available"). It still has to exist
//! for this crate to compile on its own, so it lives here as a small,
//! directly-testable value type rather than threading bare `f64` pairs
//! through the registry and orchestrator.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// A measured or derived quantity with an associated standard deviation.
///
/// Arithmetic on `UncertainValue` assumes the two operands are
/// *uncorrelated* — this is the assumption the cache's restricted scope
/// (see [`crate::cache::Cache`]) exists to preserve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertainValue {
    pub mean: f64,
    pub std_dev: f64,
}

impl UncertainValue {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// A value with no associated uncertainty (a bare scalar raw field).
    pub fn exact(mean: f64) -> Self {
        Self { mean, std_dev: 0.0 }
    }

    /// The sentinel used for `NumericalFailure` detection: NaN in either
    /// component.
    pub fn nan() -> Self {
        Self {
            mean: f64::NAN,
            std_dev: f64::NAN,
        }
    }

    pub fn is_nan(&self) -> bool {
        self.mean.is_nan() || self.std_dev.is_nan()
    }

    /// Raise to an integer power, propagating uncertainty via
    /// `d/dx x^n = n * x^(n-1)`.
    pub fn powi(&self, n: i32) -> Self {
        let mean = self.mean.powi(n);
        let derivative = n as f64 * self.mean.powi(n - 1);
        Self {
            mean,
            std_dev: (derivative.abs() * self.std_dev).abs(),
        }
    }

    /// Raise to a rational power, propagating uncertainty via
    /// `d/dx x^p = p * x^(p-1)`.
    pub fn powf(&self, p: f64) -> Self {
        let mean = self.mean.powf(p);
        let derivative = p * self.mean.powf(p - 1.0);
        Self {
            mean,
            std_dev: (derivative.abs() * self.std_dev).abs(),
        }
    }

    /// First-order uncorrelated propagation of `self` through `f`, whose
    /// derivative is `df`. `result.mean = f(self.mean)`, `result.std_dev =
    /// |df(self.mean)| * self.std_dev`.
    pub fn propagate(&self, f: impl Fn(f64) -> f64, df: impl Fn(f64) -> f64) -> Self {
        Self {
            mean: f(self.mean),
            std_dev: (df(self.mean).abs() * self.std_dev).abs(),
        }
    }
}

impl fmt::Display for UncertainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} ± {:.6}", self.mean, self.std_dev)
    }
}

impl Add for UncertainValue {
    type Output = UncertainValue;
    fn add(self, rhs: UncertainValue) -> UncertainValue {
        UncertainValue {
            mean: self.mean + rhs.mean,
            std_dev: (self.std_dev.powi(2) + rhs.std_dev.powi(2)).sqrt(),
        }
    }
}

impl Sub for UncertainValue {
    type Output = UncertainValue;
    fn sub(self, rhs: UncertainValue) -> UncertainValue {
        UncertainValue {
            mean: self.mean - rhs.mean,
            std_dev: (self.std_dev.powi(2) + rhs.std_dev.powi(2)).sqrt(),
        }
    }
}

impl Mul for UncertainValue {
    type Output = UncertainValue;
    fn mul(self, rhs: UncertainValue) -> UncertainValue {
        let mean = self.mean * rhs.mean;
        if self.mean == 0.0 || rhs.mean == 0.0 {
            // Fall back to absolute-term propagation to avoid a 0/0 relative term.
            let std_dev = ((self.std_dev * rhs.mean).powi(2) + (rhs.std_dev * self.mean).powi(2)).sqrt();
            return UncertainValue { mean, std_dev };
        }
        let rel = ((self.std_dev / self.mean).powi(2) + (rhs.std_dev / rhs.mean).powi(2)).sqrt();
        UncertainValue {
            mean,
            std_dev: (mean.abs() * rel).abs(),
        }
    }
}

impl Div for UncertainValue {
    type Output = UncertainValue;
    fn div(self, rhs: UncertainValue) -> UncertainValue {
        if rhs.mean == 0.0 {
            return UncertainValue::nan();
        }
        let mean = self.mean / rhs.mean;
        if self.mean == 0.0 {
            let std_dev = (self.std_dev / rhs.mean).abs();
            return UncertainValue { mean, std_dev };
        }
        let rel = ((self.std_dev / self.mean).powi(2) + (rhs.std_dev / rhs.mean).powi(2)).sqrt();
        UncertainValue {
            mean,
            std_dev: (mean.abs() * rel).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_has_zero_std_dev() {
        let v = UncertainValue::exact(3.0);
        assert_eq!(v.mean, 3.0);
        assert_eq!(v.std_dev, 0.0);
    }

    #[test]
    fn addition_combines_variance_in_quadrature() {
        let a = UncertainValue::new(1.0, 3.0);
        let b = UncertainValue::new(2.0, 4.0);
        let sum = a + b;
        assert_eq!(sum.mean, 3.0);
        assert!((sum.std_dev - 5.0).abs() < 1e-9); // 3-4-5 triangle
    }

    #[test]
    fn subtraction_combines_variance_in_quadrature() {
        let a = UncertainValue::new(10.0, 3.0);
        let b = UncertainValue::new(4.0, 4.0);
        let diff = a - b;
        assert_eq!(diff.mean, 6.0);
        assert!((diff.std_dev - 5.0).abs() < 1e-9);
    }

    #[test]
    fn multiplication_propagates_relative_error() {
        let a = UncertainValue::new(2.0, 0.2); // 10% relative
        let b = UncertainValue::new(3.0, 0.3); // 10% relative
        let product = a * b;
        assert_eq!(product.mean, 6.0);
        // combined relative error = sqrt(0.1^2 + 0.1^2) ~= 0.1414
        assert!((product.std_dev - 6.0 * (0.02f64).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn division_by_zero_mean_is_nan() {
        let a = UncertainValue::exact(1.0);
        let b = UncertainValue::exact(0.0);
        let result = a / b;
        assert!(result.is_nan());
    }

    #[test]
    fn powi_matches_manual_derivative() {
        let a = UncertainValue::new(2.0, 0.1);
        let squared = a.powi(2);
        assert_eq!(squared.mean, 4.0);
        // d/dx x^2 = 2x = 4, so std_dev = 4 * 0.1 = 0.4
        assert!((squared.std_dev - 0.4).abs() < 1e-9);
    }

    #[test]
    fn propagate_applies_chain_rule() {
        let a = UncertainValue::new(4.0, 0.2);
        let sqrt = a.propagate(f64::sqrt, |x| 0.5 / x.sqrt());
        assert_eq!(sqrt.mean, 2.0);
        assert!((sqrt.std_dev - (0.25 * 0.2)).abs() < 1e-9);
    }

    #[test]
    fn nan_is_detected_in_either_component() {
        assert!(UncertainValue::new(f64::NAN, 1.0).is_nan());
        assert!(UncertainValue::new(1.0, f64::NAN).is_nan());
        assert!(!UncertainValue::new(1.0, 1.0).is_nan());
    }
}
