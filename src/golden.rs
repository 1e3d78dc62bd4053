//! GoldenMath: golden-ratio and Fibonacci arithmetic plus spiral/sphere
//! point generation
//!
//! Everything here is a pure function of its arguments. These are layout
//! helpers, not user-facing validators: out-of-range inputs (negative n,
//! degenerate point counts) get a defined zero/empty result, never an error.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::constants::{GOLDEN_ANGLE, PHI, SQRT_5};

/// A 3D position on a golden spiral, with the polar parameters that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub angle: f64,
    pub radius: f64,
}

impl SpiralPoint {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// nth Fibonacci number via the Binet closed form, rounded to the nearest
/// integer. Exact up to at least n = 50; beyond that floating rounding is
/// an accepted limitation. Negative n yields 0.
pub fn fibonacci(n: i32) -> u64 {
    if n < 0 {
        return 0;
    }
    let psi = 1.0 - PHI; // the conjugate root, (1 − √5) / 2
    ((PHI.powi(n) - psi.powi(n)) / SQRT_5).round() as u64
}

/// The first n Fibonacci numbers, starting from fibonacci(0) = 0.
pub fn fibonacci_sequence(n: usize) -> Vec<u64> {
    (0..n).map(|i| fibonacci(i as i32)).collect()
}

/// Whichever Fibonacci number bracketing `target` is numerically closer;
/// ties resolve toward the larger term.
pub fn nearest_fibonacci(target: u64) -> u64 {
    let mut below = 0u64;
    let mut i = 0;
    loop {
        let fib = fibonacci(i);
        if fib >= target {
            let above = fib;
            return if target - below < above - target {
                below
            } else {
                above
            };
        }
        below = fib;
        i += 1;
    }
}

/// True iff n is a Fibonacci number: 5n² + 4 or 5n² − 4 is a perfect square.
pub fn is_fibonacci(n: u64) -> bool {
    let five_n_sq = 5 * n * n;
    is_perfect_square(five_n_sq + 4) || five_n_sq >= 4 && is_perfect_square(five_n_sq - 4)
}

fn is_perfect_square(n: u64) -> bool {
    let root = (n as f64).sqrt().round() as u64;
    root * root == n
}

/// Point on the golden spiral at parameter t:
/// radius = scale · φ^(t / 2π), angle = t, height = t · vertical_lift.
/// The spiral winds in the xz plane with y as the vertical axis. A
/// negative scale would flip the radius negative, so it is clamped to
/// zero like the other degenerate inputs here.
pub fn golden_spiral_point(t: f64, scale: f64, vertical_lift: f64) -> SpiralPoint {
    let radius = scale.max(0.0) * PHI.powf(t / TAU);
    SpiralPoint {
        x: radius * t.cos(),
        y: t * vertical_lift,
        z: radius * t.sin(),
        angle: t,
        radius,
    }
}

/// index-th of `total` points distributed uniformly on a sphere via the
/// golden-angle sunflower: y is linear in index, azimuth = index · golden
/// angle. Degenerate totals (≤ 1) collapse to the origin.
pub fn golden_sphere_point(index: usize, total: usize, radius: f64) -> Vector3<f64> {
    if total <= 1 {
        return Vector3::zeros();
    }
    let i = index as f64;
    let n = total as f64;
    let y = 1.0 - 2.0 * (i + 0.5) / n; // in (-1, 1)
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let azimuth = i * GOLDEN_ANGLE;
    Vector3::new(
        radius * ring * azimuth.cos(),
        radius * y,
        radius * ring * azimuth.sin(),
    )
}
