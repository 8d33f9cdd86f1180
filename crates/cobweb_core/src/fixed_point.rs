//! Fixed points by successive substitution (Picard iteration).

use crate::error::{Error, Result};
use crate::traits::Map;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPointSettings {
    /// Absolute tolerance on |f(y) - y| between successive iterates.
    pub tolerance: f64,
    /// Maximum number of substitution steps after the first evaluation.
    ///
    /// The cap is inclusive: exhaustion is reported once `iterations ==
    /// max_iter`, not after one more step as a `iter > max_iter` check would.
    pub max_iter: usize,
}

impl Default for FixedPointSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-11,
            max_iter: 10_000,
        }
    }
}

impl FixedPointSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidSettings {
                reason: "tolerance must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Terminal state of the iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Successive iterates differ by at most the tolerance.
    Converged,
    /// The iteration cap was reached first; `value` is the last iterate.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPointResult {
    pub status: Status,
    pub value: f64,
    pub iterations: usize,
}

impl FixedPointResult {
    pub fn converged(&self) -> bool {
        self.status == Status::Converged
    }

    /// The fixed point, or `Error::NonConvergence` if the cap was hit.
    pub fn into_result(self) -> Result<f64> {
        match self.status {
            Status::Converged => Ok(self.value),
            Status::Exhausted => Err(Error::NonConvergence {
                value: self.value,
                iterations: self.iterations,
            }),
        }
    }
}

/// Iterates `y <- f(y)` from `y0` until successive iterates are within
/// `settings.tolerance` or `settings.max_iter` substitutions have been made.
///
/// Hitting the cap is a normal outcome reported through [`Status::Exhausted`].
/// A NaN difference never counts as converged.
///
/// # Errors
///
/// Returns `Error::InvalidSettings` for a negative or non-finite tolerance.
pub fn solve<M: Map<f64> + ?Sized>(
    map: &M,
    y0: f64,
    settings: &FixedPointSettings,
) -> Result<FixedPointResult> {
    settings.validate()?;
    Ok(iterate(map, y0, settings))
}

/// [`solve`] with the default tolerance (1e-11) and cap (10000).
pub fn solve_default<M: Map<f64> + ?Sized>(map: &M, y0: f64) -> FixedPointResult {
    iterate(map, y0, &FixedPointSettings::default())
}

fn iterate<M: Map<f64> + ?Sized>(
    map: &M,
    y0: f64,
    settings: &FixedPointSettings,
) -> FixedPointResult {
    let mut y_old = y0;
    let mut y_new = map.apply(y0);
    let mut iterations = 0usize;

    let status = loop {
        if (y_new - y_old).abs() <= settings.tolerance {
            break Status::Converged;
        }
        if iterations >= settings.max_iter {
            break Status::Exhausted;
        }
        y_old = y_new;
        y_new = map.apply(y_new);
        iterations += 1;
    };

    match status {
        Status::Converged => {
            tracing::debug!(value = y_new, iterations, "fixed-point iteration converged");
        }
        Status::Exhausted => {
            tracing::warn!(
                value = y_new,
                iterations,
                residual = (y_new - y_old).abs(),
                tolerance = settings.tolerance,
                "fixed-point iteration exhausted without converging"
            );
        }
    }

    FixedPointResult {
        status,
        value: y_new,
        iterations,
    }
}
