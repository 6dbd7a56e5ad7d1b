//! Monte Carlo input and output records

use serde::{Deserialize, Serialize};

use super::presets::RiskProfile;
use crate::config::DEFAULT_NUM_SIMULATIONS;
use crate::error::{ensure_finite, ensure_non_negative, EngineError, Result};

/// Longest projection horizon accepted
pub const MAX_YEARS: u32 = 100;

/// Annual return and volatility range, in percent. Outside it a single
/// monthly growth factor can overflow to infinity.
pub const MIN_RETURN_PERCENT: f64 = -100.0;
pub const MAX_RETURN_PERCENT: f64 = 1_000.0;
pub const MAX_VOLATILITY_PERCENT: f64 = 1_000.0;

fn default_num_simulations() -> u32 { DEFAULT_NUM_SIMULATIONS }

/// Inputs for a Monte Carlo savings projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloParameters {
    /// Starting balance
    pub initial_value: f64,

    /// Added at the end of every month
    #[serde(default)]
    pub monthly_contribution: f64,

    /// Projection horizon in whole years
    pub years: u32,

    /// Annualized expected return in percent
    pub expected_return_percent: f64,

    /// Annualized standard deviation of returns in percent
    pub volatility_percent: f64,

    #[serde(default = "default_num_simulations")]
    pub num_simulations: u32,

    /// Balance counted as success when reached at the horizon
    #[serde(default)]
    pub target_value: Option<f64>,

    /// Fixes the random stream; omitted means a fresh random run
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MonteCarloParameters {
    pub fn new(
        initial_value: f64,
        monthly_contribution: f64,
        years: u32,
        expected_return_percent: f64,
        volatility_percent: f64,
    ) -> Self {
        Self {
            initial_value,
            monthly_contribution,
            years,
            expected_return_percent,
            volatility_percent,
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            target_value: None,
            seed: None,
        }
    }

    /// Parameters using a risk profile's return and volatility
    pub fn from_profile(
        initial_value: f64,
        monthly_contribution: f64,
        years: u32,
        profile: RiskProfile,
    ) -> Self {
        Self::new(
            initial_value,
            monthly_contribution,
            years,
            profile.expected_return_percent(),
            profile.volatility_percent(),
        )
    }

    pub fn with_target(mut self, target_value: f64) -> Self {
        self.target_value = Some(target_value);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_simulations(mut self, num_simulations: u32) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("initial_value", self.initial_value)?;
        ensure_non_negative("monthly_contribution", self.monthly_contribution)?;
        if self.years < 1 {
            return Err(EngineError::invalid("years", self.years as f64, "must be at least 1"));
        }
        if self.years > MAX_YEARS {
            return Err(EngineError::invalid("years", self.years as f64, "exceeds the 100 year maximum"));
        }
        ensure_finite("expected_return_percent", self.expected_return_percent)?;
        if !(MIN_RETURN_PERCENT..=MAX_RETURN_PERCENT).contains(&self.expected_return_percent) {
            return Err(EngineError::invalid(
                "expected_return_percent",
                self.expected_return_percent,
                "must be between -100 and 1000",
            ));
        }
        ensure_non_negative("volatility_percent", self.volatility_percent)?;
        if self.volatility_percent > MAX_VOLATILITY_PERCENT {
            return Err(EngineError::invalid(
                "volatility_percent",
                self.volatility_percent,
                "must not exceed 1000",
            ));
        }
        if self.num_simulations < 1 {
            return Err(EngineError::invalid(
                "num_simulations",
                self.num_simulations as f64,
                "must be at least 1",
            ));
        }
        if let Some(target) = self.target_value {
            ensure_finite("target_value", target)?;
        }
        Ok(())
    }
}

/// Percentile bands and summary statistics of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Year index for each trajectory point, 0..=years
    pub years: Vec<u32>,

    pub percentile_10: Vec<f64>,
    pub percentile_25: Vec<f64>,
    pub percentile_50: Vec<f64>,
    pub percentile_75: Vec<f64>,
    pub percentile_90: Vec<f64>,

    pub final_median: f64,
    pub final_mean: f64,

    /// Share of paths ending at or above the target, in percent
    pub probability_of_success: f64,

    // Echoed inputs
    pub initial_value: f64,
    pub monthly_contribution: f64,
    pub expected_return: f64,
    pub volatility: f64,
    pub num_simulations: u32,
    pub target_value: Option<f64>,
    pub seed: Option<u64>,
}

impl MonteCarloResult {
    /// Final value of each percentile band, lowest first
    pub fn final_percentiles(&self) -> [f64; 5] {
        let last = |band: &Vec<f64>| band.last().copied().unwrap_or(0.0);
        [
            last(&self.percentile_10),
            last(&self.percentile_25),
            last(&self.percentile_50),
            last(&self.percentile_75),
            last(&self.percentile_90),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let params = MonteCarloParameters::new(10_000.0, 500.0, 10, 7.0, 15.0);
        assert!(params.validate().is_ok());
        // Negative expected returns are allowed
        assert!(MonteCarloParameters::new(10_000.0, 0.0, 5, -2.0, 15.0).validate().is_ok());

        let cases = [
            (MonteCarloParameters::new(-1.0, 0.0, 10, 7.0, 15.0), "initial_value"),
            (MonteCarloParameters::new(0.0, -5.0, 10, 7.0, 15.0), "monthly_contribution"),
            (MonteCarloParameters::new(0.0, 0.0, 0, 7.0, 15.0), "years"),
            (MonteCarloParameters::new(0.0, 0.0, 10, 7.0, -1.0), "volatility_percent"),
            (MonteCarloParameters::new(0.0, 0.0, 10, 7.0, 15.0).with_simulations(0), "num_simulations"),
            (MonteCarloParameters::new(0.0, 0.0, 10, f64::NAN, 15.0), "expected_return_percent"),
            (MonteCarloParameters::new(0.0, 0.0, 10, 1e6, 15.0), "expected_return_percent"),
            (MonteCarloParameters::new(0.0, 0.0, 10, -150.0, 15.0), "expected_return_percent"),
            (MonteCarloParameters::new(0.0, 0.0, 10, 7.0, 5_000.0), "volatility_percent"),
            (MonteCarloParameters::new(0.0, 0.0, 101, 7.0, 15.0), "years"),
        ];
        for (params, field) in cases {
            match params.validate() {
                Err(EngineError::InvalidParameter { name, .. }) => assert_eq!(name, field),
                other => panic!("expected {} to be rejected, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_from_profile() {
        let params = MonteCarloParameters::from_profile(1_000.0, 100.0, 20, RiskProfile::Growth)
            .with_target(250_000.0)
            .with_seed(9);
        assert_eq!(params.expected_return_percent, 8.5);
        assert_eq!(params.volatility_percent, 14.0);
        assert_eq!(params.num_simulations, 1000);
        assert_eq!(params.target_value, Some(250_000.0));
        assert_eq!(params.seed, Some(9));
    }

    #[test]
    fn test_deserialize_defaults() {
        let params: MonteCarloParameters = serde_json::from_str(
            r#"{"initial_value": 0, "years": 5, "expected_return_percent": 6, "volatility_percent": 12}"#,
        )
        .unwrap();
        assert_eq!(params.num_simulations, 1000);
        assert_eq!(params.monthly_contribution, 0.0);
        assert_eq!(params.target_value, None);
        assert_eq!(params.seed, None);
    }
}
