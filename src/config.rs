//! Engine defaults with environment overrides
//!
//! Recognized variables:
//!   FINPROJ_NUM_SIMULATIONS, FINPROJ_RATE_TOLERANCE,
//!   FINPROJ_RATE_MAX_ITERATIONS, FINPROJ_SEED

use std::env;

/// Default number of Monte Carlo paths
pub const DEFAULT_NUM_SIMULATIONS: u32 = 1000;

/// Default payment-match tolerance for the rate solver
pub const DEFAULT_RATE_TOLERANCE: f64 = 1e-4;

/// Default iteration cap for the rate solver
pub const DEFAULT_RATE_MAX_ITERATIONS: u32 = 100;

/// Defaults applied when a caller leaves a tunable unspecified
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineDefaults {
    pub num_simulations: u32,
    pub rate_tolerance: f64,
    pub rate_max_iterations: u32,
    /// Fixed seed for every Monte Carlo run that does not carry its own
    pub seed: Option<u64>,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            rate_tolerance: DEFAULT_RATE_TOLERANCE,
            rate_max_iterations: DEFAULT_RATE_MAX_ITERATIONS,
            seed: None,
        }
    }
}

impl EngineDefaults {
    /// Read defaults from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build defaults from an arbitrary key lookup.
    /// Unparseable or out-of-range values fall back to the built-in default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();

        let num_simulations = lookup("FINPROJ_NUM_SIMULATIONS")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(base.num_simulations);

        let rate_tolerance = lookup("FINPROJ_RATE_TOLERANCE")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(base.rate_tolerance);

        let rate_max_iterations = lookup("FINPROJ_RATE_MAX_ITERATIONS")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(base.rate_max_iterations);

        let seed = lookup("FINPROJ_SEED").and_then(|s| s.trim().parse::<u64>().ok());

        let defaults = Self {
            num_simulations,
            rate_tolerance,
            rate_max_iterations,
            seed,
        };
        log::debug!("engine defaults: {:?}", defaults);
        defaults
    }
}
