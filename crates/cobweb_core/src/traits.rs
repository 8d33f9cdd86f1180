use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in our maps.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {
    /// Lifts an `f64` constant (a map parameter, say) into this scalar type.
    fn lift(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }
}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// The one-step state transition rule of a discrete-time system, y_{t+1} = f(y_t).
///
/// Implementations are pure: parameters are captured at construction and
/// `apply` performs no validation, so NaN and infinities propagate.
pub trait Map<T: Scalar> {
    fn apply(&self, y: T) -> T;
}

impl<T, F> Map<T> for F
where
    T: Scalar,
    F: Fn(T) -> T,
{
    fn apply(&self, y: T) -> T {
        self(y)
    }
}
