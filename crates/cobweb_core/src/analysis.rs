use crate::{
    autodiff::Dual,
    error::{Error, Result},
    traits::Map,
};
use serde::{Deserialize, Serialize};

/// |f'(y*)| within this distance of 1 is treated as non-hyperbolic.
const HYPERBOLIC_EPS: f64 = 1e-12;

/// f'(y), by forward-mode differentiation.
pub fn derivative<M: Map<Dual> + ?Sized>(map: &M, y: f64) -> f64 {
    map.apply(Dual::variable(y)).eps
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stability {
    /// |f'(y*)| < 1: nearby orbits are attracted.
    Stable,
    /// |f'(y*)| > 1: nearby orbits are repelled.
    Unstable,
    /// |f'(y*)| == 1, or f'(y*) is NaN: linearisation is inconclusive.
    NonHyperbolic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approach {
    /// f'(y*) >= 0: orbits stay on one side of y*.
    Monotone,
    /// f'(y*) < 0: orbits alternate sides of y*.
    Oscillatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub point: f64,
    pub derivative: f64,
    pub stability: Stability,
    pub approach: Approach,
}

/// Linear stability of the fixed point `y_star`.
///
/// Does not check that `y_star` is actually fixed; pair it with
/// `fixed_point::solve` or a closed-form fixed point.
pub fn classify<M: Map<Dual> + ?Sized>(map: &M, y_star: f64) -> StabilityReport {
    let slope = derivative(map, y_star);
    let magnitude = slope.abs();
    let stability = if slope.is_nan() || (magnitude - 1.0).abs() <= HYPERBOLIC_EPS {
        Stability::NonHyperbolic
    } else if magnitude < 1.0 {
        Stability::Stable
    } else {
        Stability::Unstable
    };
    let approach = if slope < 0.0 {
        Approach::Oscillatory
    } else {
        Approach::Monotone
    };

    StabilityReport {
        point: y_star,
        derivative: slope,
        stability,
        approach,
    }
}

/// Lyapunov exponent of the orbit from `y0`: the mean of ln|f'(y_t)| over
/// `steps` iterations, after discarding `transient` iterations.
///
/// Superstable points (f' = 0 on the orbit) give negative infinity.
pub fn lyapunov_exponent<M>(map: &M, y0: f64, steps: usize, transient: usize) -> Result<f64>
where
    M: Map<f64> + Map<Dual> + ?Sized,
{
    if steps == 0 {
        return Err(Error::InvalidStepCount { steps });
    }

    let mut y = y0;
    for _ in 0..transient {
        y = Map::<f64>::apply(map, y);
    }

    let mut accum = 0.0;
    for _ in 0..steps {
        let out = Map::<Dual>::apply(map, Dual::variable(y));
        accum += out.eps.abs().ln();
        y = out.val;
    }

    Ok(accum / steps as f64)
}

#[cfg(test)]
mod tests {
    use super::{classify, derivative, lyapunov_exponent, Approach, Stability};
    use crate::equation_engine::ExpressionMap;
    use crate::error::Error;
    use crate::maps::{LinearMap, LogisticMap};
    use approx::assert_abs_diff_eq;

    #[test]
    fn logistic_slope_at_fixed_point_is_two_minus_r() {
        for r in [0.5, 1.5, 2.5, 3.5] {
            let map = LogisticMap::new(r, 10.0);
            let y_star = map.fixed_points()[1];
            assert_abs_diff_eq!(derivative(&map, y_star), 2.0 - r, epsilon = 1e-12);
            assert_abs_diff_eq!(derivative(&map, 0.0), r, epsilon = 1e-12);
        }
    }

    #[test]
    fn classify_logistic_fixed_points() {
        let stable = LogisticMap::new(1.5, 10.0);
        let report = classify(&stable, stable.fixed_points()[1]);
        assert_eq!(report.stability, Stability::Stable);
        assert_eq!(report.approach, Approach::Monotone);
        assert_eq!(classify(&stable, 0.0).stability, Stability::Unstable);

        let damped = LogisticMap::new(2.5, 10.0);
        let report = classify(&damped, damped.fixed_points()[1]);
        assert_eq!(report.stability, Stability::Stable);
        assert_eq!(report.approach, Approach::Oscillatory);

        let unstable = LogisticMap::new(3.5, 10.0);
        assert_eq!(
            classify(&unstable, unstable.fixed_points()[1]).stability,
            Stability::Unstable
        );
    }

    #[test]
    fn classify_linear_map_uses_beta() {
        let stable = LinearMap::new(8.0, 0.8);
        let report = classify(&stable, 40.0);
        assert_eq!(report.stability, Stability::Stable);
        assert_abs_diff_eq!(report.derivative, 0.8);

        let flip = LinearMap::new(1.0, -1.0);
        let report = classify(&flip, 0.5);
        assert_eq!(report.stability, Stability::NonHyperbolic);
        assert_eq!(report.approach, Approach::Oscillatory);

        assert_eq!(classify(&LinearMap::new(2.0, 1.5), -4.0).stability, Stability::Unstable);
    }

    #[test]
    fn nan_slope_is_non_hyperbolic() {
        let map = LogisticMap::new(f64::NAN, 10.0);
        let report = classify(&map, 2.0);
        assert!(report.derivative.is_nan());
        assert_eq!(report.stability, Stability::NonHyperbolic);
    }

    #[test]
    fn expression_map_derivative_matches_typed_map() {
        let typed = LogisticMap::new(2.7, 50.0);
        let expr = ExpressionMap::compile("r * y * (1 - y / K)", "y", &[("r", 2.7), ("K", 50.0)])
            .expect("compile");
        for y in [0.0, 7.0, 31.0] {
            assert_abs_diff_eq!(derivative(&expr, y), derivative(&typed, y), epsilon = 1e-12);
        }
    }

    #[test]
    fn lyapunov_of_linear_map_is_log_beta() {
        let map = LinearMap::new(1.0, 0.5);
        let exponent = lyapunov_exponent(&map, 0.0, 100, 0).expect("valid");
        assert_abs_diff_eq!(exponent, 0.5f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn lyapunov_sign_separates_stable_and_chaotic_logistic() {
        let stable = LogisticMap::new(2.5, 1.0);
        let exponent = lyapunov_exponent(&stable, 0.1, 2_000, 500).expect("valid");
        assert_abs_diff_eq!(exponent, 0.5f64.ln(), epsilon = 1e-6);

        let chaotic = LogisticMap::new(4.0, 1.0);
        let exponent = lyapunov_exponent(&chaotic, 0.3, 50_000, 100).expect("valid");
        assert_abs_diff_eq!(exponent, 2.0f64.ln(), epsilon = 0.05);
    }

    #[test]
    fn lyapunov_requires_steps() {
        let map = LinearMap::new(1.0, 0.5);
        assert_eq!(
            lyapunov_exponent(&map, 0.0, 0, 10),
            Err(Error::InvalidStepCount { steps: 0 })
        );
    }
}
