mod ray;
mod vector;

use std::ops::Range;

pub use ray::*;
pub use vector::*;

/// A very small value, close to zero, used to keep rays from striking the
/// surface they start on.
pub const EPSILON: f64 = 1e-6;

/// Remap a number from one range to another.
pub fn remap(t: f64, a: Range<f64>, b: Range<f64>) -> f64 {
    (t - a.start) * ((b.end - b.start) / (a.end - a.start)) + b.start
}
