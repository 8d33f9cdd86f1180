//! Trajectory generation, with optional additive observation noise.

use crate::error::{Error, Result};
use crate::traits::Map;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// States y_0, ..., y_{T-1} of one iteration run.
pub type Trajectory = Vec<f64>;

/// A trajectory observed through additive Gaussian noise.
///
/// `observed[t] == deterministic[t] + noise[t]` for every `t`. The noise never
/// enters the recursion: `deterministic` is exactly what `generate` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticTrajectory {
    pub deterministic: Trajectory,
    pub noise: Vec<f64>,
    pub observed: Trajectory,
}

/// Iterates `map` from `y0`, returning `steps` states with `y0` first.
///
/// Non-finite values are carried forward as produced.
pub fn generate<M: Map<f64> + ?Sized>(map: &M, y0: f64, steps: usize) -> Result<Trajectory> {
    if steps == 0 {
        return Err(Error::InvalidStepCount { steps });
    }

    let mut states = Vec::with_capacity(steps);
    let mut y = y0;
    states.push(y);
    for _ in 1..steps {
        y = map.apply(y);
        states.push(y);
    }
    Ok(states)
}

/// Draws `steps` independent samples from Normal(0, `variance`).
pub fn noise_series<R: Rng + ?Sized>(
    steps: usize,
    variance: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if !variance.is_finite() || variance < 0.0 {
        return Err(Error::InvalidNoiseVariance { variance });
    }
    let normal = Normal::new(0.0, variance.sqrt())
        .map_err(|_| Error::InvalidNoiseVariance { variance })?;
    Ok((0..steps).map(|_| normal.sample(&mut *rng)).collect())
}

/// Deterministic trajectory plus observation noise drawn from `rng`.
///
/// The deterministic pass runs first and the noise is added afterwards, so
/// for a given generator state the draws do not depend on the map.
pub fn generate_stochastic<M, R>(
    map: &M,
    y0: f64,
    steps: usize,
    noise_variance: f64,
    rng: &mut R,
) -> Result<StochasticTrajectory>
where
    M: Map<f64> + ?Sized,
    R: Rng + ?Sized,
{
    let deterministic = generate(map, y0, steps)?;
    let noise = noise_series(steps, noise_variance, rng)?;
    let observed = deterministic
        .iter()
        .zip(&noise)
        .map(|(y, e)| y + e)
        .collect();

    Ok(StochasticTrajectory {
        deterministic,
        noise,
        observed,
    })
}

/// Like [`generate_stochastic`], with a fresh `StdRng` seeded from `seed`.
pub fn generate_stochastic_seeded<M: Map<f64> + ?Sized>(
    map: &M,
    y0: f64,
    steps: usize,
    noise_variance: f64,
    seed: u64,
) -> Result<StochasticTrajectory> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_stochastic(map, y0, steps, noise_variance, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::{generate, generate_stochastic, generate_stochastic_seeded, noise_series};
    use crate::error::Error;
    use crate::maps::{LinearMap, LogisticMap};
    use crate::traits::Map;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generate_has_requested_length_and_initial_state() {
        let map = LinearMap::new(8.0, 0.8);
        for steps in [1, 2, 17, 100] {
            let traj = generate(&map, 0.001, steps).expect("valid steps");
            assert_eq!(traj.len(), steps);
            assert_eq!(traj[0], 0.001);
        }
    }

    #[test]
    fn single_step_is_singleton() {
        let map = LogisticMap::new(3.2, 1.0);
        assert_eq!(generate(&map, 0.4, 1).expect("valid"), vec![0.4]);
    }

    #[test]
    fn each_state_is_map_of_previous() {
        let map = LogisticMap::new(2.9, 100.0);
        let traj = generate(&map, 5.0, 50).expect("valid");
        for t in 1..traj.len() {
            assert_eq!(traj[t], Map::<f64>::apply(&map, traj[t - 1]));
        }
    }

    #[test]
    fn zero_steps_is_rejected() {
        let map = LinearMap::new(1.0, 0.5);
        assert_eq!(generate(&map, 0.0, 0), Err(Error::InvalidStepCount { steps: 0 }));
        assert!(matches!(
            generate_stochastic_seeded(&map, 0.0, 0, 1.0, 7),
            Err(Error::InvalidStepCount { steps: 0 })
        ));
    }

    #[test]
    fn overflow_and_nan_pass_through() {
        let map = LinearMap::new(0.0, 1e200);
        let traj = generate(&map, 1e200, 4).expect("valid");
        assert!(traj[1].is_infinite());
        assert!(traj[3].is_infinite());

        let nan_map = |y: f64| y * f64::NAN;
        let traj = generate(&nan_map, 1.0, 3).expect("valid");
        assert_eq!(traj[0], 1.0);
        assert!(traj[1].is_nan() && traj[2].is_nan());
    }

    #[test]
    fn stochastic_is_deterministic_plus_noise() {
        let map = LinearMap::new(8.0, 0.8);
        let run = generate_stochastic_seeded(&map, 0.001, 200, 4.0, 42).expect("valid");

        assert_eq!(run.deterministic, generate(&map, 0.001, 200).expect("valid"));
        assert_eq!(run.noise.len(), 200);
        for t in 0..200 {
            assert_eq!(run.observed[t], run.deterministic[t] + run.noise[t]);
        }
    }

    #[test]
    fn noise_does_not_feed_back_into_recursion() {
        // With process noise the state would drift away from the deterministic orbit.
        let map = LinearMap::new(0.0, 1.0);
        let run = generate_stochastic_seeded(&map, 5.0, 50, 1.0, 3).expect("valid");
        assert!(run.deterministic.iter().all(|&y| y == 5.0));
    }

    #[test]
    fn seeded_runs_reproduce() {
        let map = LogisticMap::new(1.5, 10.0);
        let a = generate_stochastic_seeded(&map, 0.001, 64, 0.25, 11).expect("valid");
        let b = generate_stochastic_seeded(&map, 0.001, 64, 0.25, 11).expect("valid");
        let c = generate_stochastic_seeded(&map, 0.001, 64, 0.25, 12).expect("valid");
        assert_eq!(a, b);
        assert_ne!(a.noise, c.noise);
    }

    #[test]
    fn caller_owned_rng_continues_its_stream() {
        let map = LinearMap::new(1.0, 0.5);
        let mut rng = StdRng::seed_from_u64(9);
        let first = generate_stochastic(&map, 0.0, 10, 1.0, &mut rng).expect("valid");
        let second = generate_stochastic(&map, 0.0, 10, 1.0, &mut rng).expect("valid");
        assert_eq!(first.deterministic, second.deterministic);
        assert_ne!(first.noise, second.noise);
    }

    #[test]
    fn noise_series_matches_requested_variance() {
        let mut rng = StdRng::seed_from_u64(2024);
        let noise = noise_series(20_000, 9.0, &mut rng).expect("valid");
        let n = noise.len() as f64;
        let mean = noise.iter().sum::<f64>() / n;
        let var = noise.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / (n - 1.0);
        assert!(mean.abs() < 0.1, "mean {mean}");
        assert_relative_eq!(var, 9.0, max_relative = 0.05);
    }

    #[test]
    fn zero_variance_gives_zero_noise_and_bad_variance_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let noise = noise_series(5, 0.0, &mut rng).expect("valid");
        assert!(noise.iter().all(|&e| e == 0.0));

        for variance in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                noise_series(5, variance, &mut rng),
                Err(Error::InvalidNoiseVariance { .. })
            ));
        }
    }
}
