//! Monte Carlo projector
//!
//! Discretized geometric Brownian motion with monthly steps and a fixed
//! contribution added after each month's growth. Every path owns an RNG stream
//! seeded from the run's master generator, so paths are simulated in parallel
//! and the result does not depend on how rayon schedules them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use super::params::{MonteCarloParameters, MonteCarloResult};
use super::stats::{mean, percentile_sorted, reported_percentiles};
use crate::error::{EngineError, Result};

const MONTHS_PER_YEAR: usize = 12;

/// Stateless Monte Carlo calculator
pub struct MonteCarloProjector;

impl MonteCarloProjector {
    /// Run a projection, seeding from `params.seed` or OS entropy
    pub fn project(params: &MonteCarloParameters) -> Result<MonteCarloResult> {
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::project_with_rng(params, &mut rng)
    }

    /// Run a projection drawing path seeds from a caller-supplied generator.
    /// `params.seed` is echoed but not used to seed anything here.
    pub fn project_with_rng<R: Rng + ?Sized>(
        params: &MonteCarloParameters,
        rng: &mut R,
    ) -> Result<MonteCarloResult> {
        params.validate()?;

        let monthly_return = params.expected_return_percent / 100.0 / 12.0;
        let monthly_volatility = params.volatility_percent / 100.0 / 12f64.sqrt();
        // Drift correction so the arithmetic mean monthly growth matches monthly_return
        let drift = monthly_return - 0.5 * monthly_volatility * monthly_volatility;
        let step = Normal::new(drift, monthly_volatility).map_err(|_| {
            EngineError::invalid("volatility_percent", params.volatility_percent, "not a valid deviation")
        })?;

        let years = params.years as usize;
        let num_paths = params.num_simulations as usize;
        let stride = years + 1;

        log::debug!(
            "monte carlo: {} paths x {} months (drift {:.6}, vol {:.6})",
            num_paths,
            years * MONTHS_PER_YEAR,
            drift,
            monthly_volatility
        );

        let path_seeds: Vec<u64> = (0..num_paths).map(|_| rng.gen()).collect();

        // Year-end balances, one row of `stride` values per path
        let mut grid = vec![0.0; num_paths * stride];
        grid.par_chunks_mut(stride)
            .zip(path_seeds.par_iter())
            .for_each(|(row, &seed)| {
                simulate_path(row, seed, &step, params.initial_value, params.monthly_contribution);
            });

        let bands: Vec<[f64; 5]> = (0..stride)
            .into_par_iter()
            .map(|year| {
                let mut column: Vec<f64> = grid.iter().skip(year).step_by(stride).copied().collect();
                reported_percentiles(&mut column)
            })
            .collect();

        let mut finals: Vec<f64> = grid.iter().skip(years).step_by(stride).copied().collect();
        let final_mean = mean(&finals);
        let probability_of_success = match params.target_value {
            Some(target) if target > 0.0 => {
                let hits = finals.iter().filter(|&&v| v >= target).count();
                hits as f64 / num_paths as f64 * 100.0
            }
            _ => 0.0,
        };
        finals.sort_by(|a, b| a.total_cmp(b));
        let final_median = percentile_sorted(&finals, 50.0);

        let band = |k: usize| bands.iter().map(|b| b[k]).collect::<Vec<f64>>();

        Ok(MonteCarloResult {
            years: (0..=params.years).collect(),
            percentile_10: band(0),
            percentile_25: band(1),
            percentile_50: band(2),
            percentile_75: band(3),
            percentile_90: band(4),
            final_median,
            final_mean,
            probability_of_success,
            initial_value: params.initial_value,
            monthly_contribution: params.monthly_contribution,
            expected_return: params.expected_return_percent,
            volatility: params.volatility_percent,
            num_simulations: params.num_simulations,
            target_value: params.target_value,
            seed: params.seed,
        })
    }
}

/// Fill `year_ends` with the balance at each year boundary of one path
fn simulate_path(
    year_ends: &mut [f64],
    seed: u64,
    step: &Normal<f64>,
    initial_value: f64,
    monthly_contribution: f64,
) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut value = initial_value;
    year_ends[0] = value;

    for slot in year_ends.iter_mut().skip(1) {
        for _ in 0..MONTHS_PER_YEAR {
            let log_return: f64 = step.sample(&mut rng);
            value = value * log_return.exp() + monthly_contribution;
        }
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sample_params() -> MonteCarloParameters {
        MonteCarloParameters::new(50_000.0, 1_000.0, 20, 7.0, 15.0)
            .with_simulations(500)
            .with_seed(42)
    }

    #[test]
    fn test_result_shape() {
        let result = MonteCarloProjector::project(&sample_params()).unwrap();
        assert_eq!(result.years, (0..=20).collect::<Vec<u32>>());
        for band in [
            &result.percentile_10,
            &result.percentile_25,
            &result.percentile_50,
            &result.percentile_75,
            &result.percentile_90,
        ] {
            assert_eq!(band.len(), 21);
            assert_eq!(band[0], 50_000.0);
        }
        assert_eq!(result.num_simulations, 500);
        assert_eq!(result.expected_return, 7.0);
        assert_eq!(result.volatility, 15.0);
        assert_eq!(result.seed, Some(42));
    }

    #[test]
    fn test_percentiles_are_ordered() {
        let result = MonteCarloProjector::project(&sample_params()).unwrap();
        for y in 0..result.years.len() {
            assert!(result.percentile_10[y] <= result.percentile_25[y]);
            assert!(result.percentile_25[y] <= result.percentile_50[y]);
            assert!(result.percentile_50[y] <= result.percentile_75[y]);
            assert!(result.percentile_75[y] <= result.percentile_90[y]);
        }
        let last = result.years.len() - 1;
        assert!(result.percentile_10[last] < result.percentile_90[last]);
        assert_eq!(result.final_median, result.percentile_50[last]);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let a = MonteCarloProjector::project(&sample_params()).unwrap();
        let b = MonteCarloProjector::project(&sample_params()).unwrap();
        assert_eq!(a, b);

        let c = MonteCarloProjector::project(&sample_params().with_seed(43)).unwrap();
        assert_ne!(a.percentile_50, c.percentile_50);
    }

    #[test]
    fn test_explicit_rng_matches_seeded_run() {
        let params = sample_params();
        let mut rng = StdRng::seed_from_u64(42);
        let threaded = MonteCarloProjector::project_with_rng(&params, &mut rng).unwrap();
        let seeded = MonteCarloProjector::project(&params).unwrap();
        assert_eq!(threaded, seeded);
    }

    #[test]
    fn test_zero_volatility_collapses_paths() {
        let params = MonteCarloParameters::new(10_000.0, 200.0, 5, 6.0, 0.0)
            .with_simulations(50)
            .with_seed(1);
        let result = MonteCarloProjector::project(&params).unwrap();

        assert_eq!(result.percentile_10, result.percentile_90);
        assert_eq!(result.percentile_25, result.percentile_75);
        assert_eq!(result.percentile_10, result.percentile_50);
        assert_relative_eq!(result.final_mean, result.final_median, max_relative = 1e-12);

        // Deterministic path: v = v * e^(r/12) + c each month
        let growth = (0.06f64 / 12.0).exp();
        let mut expected = 10_000.0;
        for _ in 0..60 {
            expected = expected * growth + 200.0;
        }
        assert_relative_eq!(result.final_median, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_return_zero_volatility_only_accumulates() {
        let params = MonteCarloParameters::new(1_000.0, 100.0, 2, 0.0, 0.0)
            .with_simulations(3)
            .with_seed(7);
        let result = MonteCarloProjector::project(&params).unwrap();
        assert_abs_diff_eq!(result.percentile_50[1], 2_200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.percentile_50[2], 3_400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mean_tracks_expected_return() {
        // With the drift correction E[e^draw] = e^(r/12), so a lump sum has
        // E[V_T] = V_0 * e^(r/12 * months), up to sampling noise
        let params = MonteCarloParameters::new(100_000.0, 0.0, 10, 6.0, 12.0)
            .with_simulations(4_000)
            .with_seed(2024);
        let result = MonteCarloProjector::project(&params).unwrap();
        let expected = 100_000.0 * (0.06 / 12.0 * 120.0f64).exp();
        assert_relative_eq!(result.final_mean, expected, max_relative = 0.03);
        // Median sits below the mean for a log-normal outcome
        assert!(result.final_median < result.final_mean);
    }

    #[test]
    fn test_probability_of_success_bounds() {
        let base = sample_params();

        let none = MonteCarloProjector::project(&base).unwrap();
        assert_eq!(none.probability_of_success, 0.0);

        let negative = MonteCarloProjector::project(&base.clone().with_target(-10.0)).unwrap();
        assert_eq!(negative.probability_of_success, 0.0);

        let trivial = MonteCarloProjector::project(&base.clone().with_target(1.0)).unwrap();
        assert_eq!(trivial.probability_of_success, 100.0);

        let impossible = MonteCarloProjector::project(&base.clone().with_target(1e15)).unwrap();
        assert_eq!(impossible.probability_of_success, 0.0);

        let median_target = none.final_median;
        let mid = MonteCarloProjector::project(&base.with_target(median_target)).unwrap();
        assert!(mid.probability_of_success >= 40.0 && mid.probability_of_success <= 60.0);
    }

    #[test]
    fn test_empty_portfolio_at_return_cap_stays_zero() {
        let params = MonteCarloParameters::new(0.0, 0.0, 30, 1_000.0, 1_000.0)
            .with_simulations(200)
            .with_seed(11);
        let result = MonteCarloProjector::project(&params).unwrap();
        for band in [&result.percentile_10, &result.percentile_50, &result.percentile_90] {
            assert!(band.iter().all(|&v| v == 0.0));
        }
        assert_eq!(result.final_mean, 0.0);

        let params = MonteCarloParameters::new(0.0, 0.0, 30, 1e6, 0.0).with_seed(11);
        assert!(matches!(
            MonteCarloProjector::project(&params),
            Err(EngineError::InvalidParameter { name: "expected_return_percent", .. })
        ));
    }

    #[test]
    fn test_single_simulation() {
        let params = MonteCarloParameters::new(1_000.0, 0.0, 3, 5.0, 20.0)
            .with_simulations(1)
            .with_seed(3);
        let result = MonteCarloProjector::project(&params).unwrap();
        assert_eq!(result.percentile_10, result.percentile_90);
        assert_eq!(result.final_mean, result.final_median);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let params = MonteCarloParameters::new(1_000.0, 0.0, 3, 5.0, -20.0);
        assert!(matches!(
            MonteCarloProjector::project(&params),
            Err(EngineError::InvalidParameter { name: "volatility_percent", .. })
        ));
        let params = MonteCarloParameters::new(1_000.0, 0.0, 3, 5.0, 20.0).with_simulations(0);
        assert!(MonteCarloProjector::project(&params).is_err());
    }
}
