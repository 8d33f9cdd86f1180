//! The `cobweb_core` crate iterates one-dimensional maps y_{t+1} = f(y_t) and
//! produces plain data for plotting code: trajectories, cobweb traces and
//! fixed points.
//!
//! Key components:
//! - **Traits**: `Scalar` (f64 or `Dual`) and `Map` (the one-step rule).
//! - **Maps**: `LinearMap`, `LogisticMap`, plus any `Fn(f64) -> f64`.
//! - **Equation Engine**: `ExpressionMap`, a map compiled from a string.
//! - **Trajectory**: deterministic runs and runs with observation noise.
//! - **Cobweb**: segment traces and curve sampling over a `Domain`.
//! - **Fixed Point**: successive substitution with an explicit exhaustion status.
//! - **Analysis**: derivatives via `Dual`, fixed-point stability, Lyapunov exponents.

pub mod analysis;
pub mod autodiff;
pub mod cobweb;
pub mod equation_engine;
pub mod error;
pub mod fixed_point;
pub mod maps;
pub mod traits;
pub mod trajectory;

pub use error::{Error, Result};
