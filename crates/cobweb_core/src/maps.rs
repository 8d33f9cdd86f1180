//! Concrete one-dimensional maps.

use crate::traits::{Map, Scalar};
use serde::{Deserialize, Serialize};

/// Linear map f(y) = alpha + beta * y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearMap {
    pub alpha: f64,
    pub beta: f64,
}

impl LinearMap {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Closed-form fixed point alpha / (1 - beta), or `None` when beta == 1.
    pub fn fixed_point(&self) -> Option<f64> {
        if self.beta == 1.0 {
            None
        } else {
            Some(self.alpha / (1.0 - self.beta))
        }
    }
}

impl<T: Scalar> Map<T> for LinearMap {
    fn apply(&self, y: T) -> T {
        T::lift(self.alpha) + T::lift(self.beta) * y
    }
}

/// Logistic growth map f(y) = r * y * (1 - y / K).
///
/// `r` is the growth rate and `k` the carrying capacity. Inputs outside
/// `[0, K]` are evaluated as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticMap {
    pub r: f64,
    pub k: f64,
}

impl LogisticMap {
    pub fn new(r: f64, k: f64) -> Self {
        Self { r, k }
    }

    /// The two fixed points: extinction at 0 and K * (1 - 1/r).
    pub fn fixed_points(&self) -> [f64; 2] {
        [0.0, self.k * (1.0 - 1.0 / self.r)]
    }
}

impl<T: Scalar> Map<T> for LogisticMap {
    fn apply(&self, y: T) -> T {
        let one = T::one();
        T::lift(self.r) * y * (one - y / T::lift(self.k))
    }
}
