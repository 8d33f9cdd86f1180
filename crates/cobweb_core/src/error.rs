use thiserror::Error;

/// Errors reported by the iteration, tracing and solving routines.
///
/// Overflow and NaN are not errors: they flow through every routine untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("step count must be at least 1, got {steps}")]
    InvalidStepCount { steps: usize },

    #[error("noise variance must be finite and non-negative, got {variance}")]
    InvalidNoiseVariance { variance: f64 },

    #[error("invalid settings: {reason}")]
    InvalidSettings { reason: &'static str },

    #[error("fixed-point iteration exhausted after {iterations} iterations at {value}")]
    NonConvergence { value: f64, iterations: usize },

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
