//! Financial projection engine
//!
//! This library provides:
//! - Loan amortization schedules with optional extra repayments
//! - Implied interest rate estimation from a fixed payment
//! - Monte Carlo projections of savings under random market returns
//! - Goal and retirement scenarios built on risk-profile presets
//!
//! All calculators are pure: identical inputs (and seed) give identical outputs.

pub mod error;
pub mod config;
pub mod loan;
pub mod simulation;
pub mod scenario;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use config::EngineDefaults;
pub use loan::{
    AmortizationEngine, BalanceTrajectory, LoanParameters, LoanScheduleSummary, PaymentFrequency,
    RateEstimationInputs, RateEstimator,
};
pub use simulation::{MonteCarloParameters, MonteCarloProjector, MonteCarloResult, RiskProfile};
pub use scenario::{goal_projection, retirement_projection, GoalInputs, RetirementInputs, ScenarioRunner};
