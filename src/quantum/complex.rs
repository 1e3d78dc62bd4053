//! An explicit complex-number type for amplitude arithmetic
//!
//! Gate math over bare two-element tuples invites index-transposition
//! bugs; a named type with real operators does not.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };

    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// r·e^{iθ}
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self {
            re: r * theta.cos(),
            im: r * theta.sin(),
        }
    }

    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    /// |z|²
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn abs(self) -> f64 {
        self.norm_sqr().sqrt()
    }

    pub fn scale(self, factor: f64) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }

    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_multiplication() {
        // (1 + 2i)(3 + 4i) = 3 + 4i + 6i − 8 = −5 + 10i
        let z = Complex::new(1.0, 2.0) * Complex::new(3.0, 4.0);
        assert!((z.re + 5.0).abs() < 1e-12);
        assert!((z.im - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_conjugate_product_is_norm() {
        let z = Complex::new(3.0, -4.0);
        let p = z * z.conj();
        assert!((p.re - 25.0).abs() < 1e-12);
        assert!(p.im.abs() < 1e-12);
        assert!((z.abs() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_polar() {
        let z = Complex::from_polar(2.0, PI / 2.0);
        assert!(z.re.abs() < 1e-12);
        assert!((z.im - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_phases_compose() {
        let half = Complex::from_polar(1.0, PI / 3.0);
        let full = half * half;
        let direct = Complex::from_polar(1.0, 2.0 * PI / 3.0);
        assert!((full.re - direct.re).abs() < 1e-12);
        assert!((full.im - direct.im).abs() < 1e-12);
    }
}
