//! Scenario runner for goal and retirement projections
//!
//! Translates savings goals and superannuation-style retirement plans into
//! Monte Carlo parameters, filling unspecified tunables from `EngineDefaults`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineDefaults;
use crate::error::{ensure_non_negative, ensure_positive, EngineError, Result};
use crate::simulation::{MonteCarloParameters, MonteCarloProjector, MonteCarloResult, RiskProfile};

fn default_employer_rate() -> f64 { 11.5 }

/// Retirement savings plan funded from salary contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementInputs {
    pub current_age: u32,
    pub retirement_age: u32,

    /// Balance already saved for retirement
    pub current_balance: f64,
    pub annual_salary: f64,

    /// Employer contribution as percent of salary
    #[serde(default = "default_employer_rate")]
    pub employer_contribution_rate: f64,

    /// Voluntary contribution as percent of salary
    #[serde(default)]
    pub personal_contribution_rate: f64,

    #[serde(default)]
    pub risk_profile: RiskProfile,

    #[serde(default)]
    pub target_balance: Option<f64>,

    #[serde(default)]
    pub num_simulations: Option<u32>,

    #[serde(default)]
    pub seed: Option<u64>,
}

impl RetirementInputs {
    /// Salary-funded contribution added each month
    pub fn monthly_contribution(&self) -> f64 {
        self.annual_salary * (self.employer_contribution_rate + self.personal_contribution_rate)
            / 100.0
            / 12.0
    }

    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    fn validate(&self) -> Result<()> {
        if self.retirement_age <= self.current_age {
            return Err(EngineError::invalid(
                "retirement_age",
                self.retirement_age as f64,
                "must be later than current_age",
            ));
        }
        ensure_non_negative("current_balance", self.current_balance)?;
        ensure_non_negative("annual_salary", self.annual_salary)?;
        ensure_non_negative("employer_contribution_rate", self.employer_contribution_rate)?;
        ensure_non_negative("personal_contribution_rate", self.personal_contribution_rate)?;
        Ok(())
    }
}

/// A savings goal with a fixed amount and timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInputs {
    pub goal_amount: f64,

    #[serde(default)]
    pub current_savings: f64,

    #[serde(default)]
    pub monthly_savings: f64,

    pub timeline_years: u32,

    #[serde(default)]
    pub risk_profile: RiskProfile,

    #[serde(default)]
    pub num_simulations: Option<u32>,

    #[serde(default)]
    pub seed: Option<u64>,
}

/// Runs scenario projections against a fixed set of engine defaults
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    defaults: EngineDefaults,
}

impl ScenarioRunner {
    /// Runner with built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with defaults read from the environment
    pub fn from_env() -> Self {
        Self {
            defaults: EngineDefaults::from_env(),
        }
    }

    pub fn with_defaults(defaults: EngineDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &EngineDefaults {
        &self.defaults
    }

    /// Monte Carlo parameters equivalent to a retirement plan
    pub fn retirement_parameters(&self, inputs: &RetirementInputs) -> Result<MonteCarloParameters> {
        inputs.validate()?;
        let profile = inputs.risk_profile;
        Ok(MonteCarloParameters {
            initial_value: inputs.current_balance,
            monthly_contribution: inputs.monthly_contribution(),
            years: inputs.years_to_retirement(),
            expected_return_percent: profile.expected_return_percent(),
            volatility_percent: profile.volatility_percent(),
            num_simulations: inputs.num_simulations.unwrap_or(self.defaults.num_simulations),
            target_value: inputs.target_balance,
            seed: inputs.seed.or(self.defaults.seed),
        })
    }

    /// Monte Carlo parameters equivalent to a savings goal
    pub fn goal_parameters(&self, inputs: &GoalInputs) -> Result<MonteCarloParameters> {
        ensure_positive("goal_amount", inputs.goal_amount)?;
        let profile = inputs.risk_profile;
        Ok(MonteCarloParameters {
            initial_value: inputs.current_savings,
            monthly_contribution: inputs.monthly_savings,
            years: inputs.timeline_years,
            expected_return_percent: profile.expected_return_percent(),
            volatility_percent: profile.volatility_percent(),
            num_simulations: inputs.num_simulations.unwrap_or(self.defaults.num_simulations),
            target_value: Some(inputs.goal_amount),
            seed: inputs.seed.or(self.defaults.seed),
        })
    }

    pub fn run_retirement(&self, inputs: &RetirementInputs) -> Result<MonteCarloResult> {
        MonteCarloProjector::project(&self.retirement_parameters(inputs)?)
    }

    pub fn run_goal(&self, inputs: &GoalInputs) -> Result<MonteCarloResult> {
        MonteCarloProjector::project(&self.goal_parameters(inputs)?)
    }

    /// Run independent projections in parallel, preserving input order
    pub fn run_batch(&self, requests: &[MonteCarloParameters]) -> Vec<Result<MonteCarloResult>> {
        requests
            .par_iter()
            .map(|params| {
                let mut params = params.clone();
                params.seed = params.seed.or(self.defaults.seed);
                MonteCarloProjector::project(&params)
            })
            .collect()
    }
}

/// Retirement projection with built-in defaults
pub fn retirement_projection(inputs: &RetirementInputs) -> Result<MonteCarloResult> {
    ScenarioRunner::new().run_retirement(inputs)
}

/// Goal projection with built-in defaults
pub fn goal_projection(inputs: &GoalInputs) -> Result<MonteCarloResult> {
    ScenarioRunner::new().run_goal(inputs)
}
