//! Loan calculators: amortization schedules and implied-rate estimation

mod params;
mod schedule;
mod amortization;
mod rate;

pub use params::{LoanParameters, PaymentFrequency, RateEstimationInputs};
pub use schedule::{BalanceTrajectory, ExtraPaymentComparison, LoanScheduleSummary, ScheduleRow};
pub use amortization::{periodic_payment, AmortizationEngine};
pub use rate::{remaining_periods, RateEstimator};
